//! Reprice an open offer
//!
//! The offer is closed at its current price and reopened at the new price in
//! the same transaction. Both trade states differ whenever the prices differ,
//! so a failed transaction leaves the original offer untouched; there is no
//! partially-applied state to compensate for.

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use crate::host::DynSigner;
use crate::operations::cancel_offer::close_offer_record;
use crate::operations::make_offer::{buyer_trade_state, create_offer_record, OfferAddresses};
use crate::operations::{AuctionHouseAccounts, Operation, OperationEnv};
use crate::pdas::RewardCenterPdas;
use crate::price::to_base_units;
use crate::tx_builder::{RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct UpdateOfferInput {
    pub current_offer_price: String,
    pub new_offer_price: String,
    pub auction_house: AuctionHouseAccounts,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    pub associated_token_account: Pubkey,
    pub buyer: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &UpdateOfferInput,
    buyer: &DynSigner,
    payer: Option<DynSigner>,
) -> RewardCenterResult<TransactionBuilder<()>> {
    let current_price = to_base_units(&input.current_offer_price)?;
    let new_price = to_base_units(&input.new_offer_price)?;
    let buyer_key = buyer.pubkey();
    let ah = &input.auction_house;

    let addresses = OfferAddresses::derive(pdas, &buyer_key, &ah.address, &input.metadata)?;
    let current_trade_state =
        buyer_trade_state(pdas, &buyer_key, ah, &input.token_mint, current_price)?;
    let new_trade_state = buyer_trade_state(pdas, &buyer_key, ah, &input.token_mint, new_price)?;

    let mut builder = TransactionBuilder::new(()).set_fee_payer(payer);
    builder.add(close_offer_record(
        pdas,
        buyer,
        ah,
        &addresses,
        current_trade_state,
        input.associated_token_account,
        input.token_mint,
        input.metadata,
    )?);
    builder.add(create_offer_record(
        pdas,
        buyer,
        ah,
        &addresses,
        new_trade_state,
        input.associated_token_account,
        input.metadata,
        new_price,
        "createOffer",
    )?);
    Ok(builder)
}

#[async_trait]
impl Operation for UpdateOfferInput {
    type Context = ();
    const NAME: &'static str = "update_offer";
    const SIGNER_ROLE: &'static str = "buyer";

    fn address_lookup_table(&self) -> &Pubkey {
        &self.address_lookup_table
    }

    fn signer(&self) -> Option<&DynSigner> {
        self.buyer.as_ref()
    }

    async fn prepare(
        &self,
        env: OperationEnv<'_>,
        signer: DynSigner,
        payer: Option<DynSigner>,
    ) -> RewardCenterResult<TransactionBuilder<Self::Context>> {
        build(env.pdas, self, &signer, payer)
    }
}
