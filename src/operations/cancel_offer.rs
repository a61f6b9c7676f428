//! Withdraw an open offer

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use crate::host::DynSigner;
use crate::operations::make_offer::{buyer_trade_state, OfferAddresses};
use crate::operations::{AuctionHouseAccounts, Operation, OperationEnv};
use crate::pdas::{Pda, RewardCenterPdas};
use crate::price::to_base_units;
use crate::program::{self, CloseOfferAccounts, CloseOfferParams};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct CancelOfferInput {
    /// Price the open offer was placed at
    pub current_offer_price: String,
    pub auction_house: AuctionHouseAccounts,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    pub associated_token_account: Pubkey,
    pub buyer: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

/// The `close_offer` record closing `trade_state`
#[allow(clippy::too_many_arguments)]
pub(crate) fn close_offer_record(
    pdas: &RewardCenterPdas,
    buyer: &DynSigner,
    auction_house: &AuctionHouseAccounts,
    addresses: &OfferAddresses,
    trade_state: Pda,
    associated_token_account: Pubkey,
    token_mint: Pubkey,
    metadata: Pubkey,
) -> RewardCenterResult<InstructionRecord> {
    let buyer_key = buyer.pubkey();
    let accounts = CloseOfferAccounts {
        wallet: buyer_key,
        offer: addresses.offer,
        treasury_mint: auction_house.treasury_mint,
        token_account: associated_token_account,
        receipt_account: buyer_key,
        escrow_payment_account: addresses.escrow_payment_account.address,
        metadata,
        token_mint,
        authority: auction_house.authority,
        reward_center: addresses.reward_center,
        auction_house: auction_house.address,
        auction_house_fee_account: auction_house.fee_account,
        trade_state: trade_state.address,
        ah_auctioneer_pda: addresses.auctioneer,
    };
    let params = CloseOfferParams {
        escrow_payment_bump: addresses.escrow_payment_account.bump,
    };
    Ok(InstructionRecord::new(
        program::close_offer(pdas.programs(), &accounts, params)?,
        vec![buyer.clone()],
        "closeOffer",
    ))
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &CancelOfferInput,
    buyer: &DynSigner,
    payer: Option<DynSigner>,
) -> RewardCenterResult<TransactionBuilder<()>> {
    let current_price = to_base_units(&input.current_offer_price)?;
    let buyer_key = buyer.pubkey();
    let ah = &input.auction_house;

    let addresses = OfferAddresses::derive(pdas, &buyer_key, &ah.address, &input.metadata)?;
    let trade_state = buyer_trade_state(pdas, &buyer_key, ah, &input.token_mint, current_price)?;

    let mut builder = TransactionBuilder::new(()).set_fee_payer(payer);
    builder.add(close_offer_record(
        pdas,
        buyer,
        ah,
        &addresses,
        trade_state,
        input.associated_token_account,
        input.token_mint,
        input.metadata,
    )?);
    Ok(builder)
}

#[async_trait]
impl Operation for CancelOfferInput {
    type Context = ();
    const NAME: &'static str = "cancel_offer";
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

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Keypair;
    use std::sync::Arc;

    #[test]
    fn test_closes_trade_state_at_current_price() {
        let pdas = RewardCenterPdas::default();
        let buyer: DynSigner = Arc::new(Keypair::new());
        let input = CancelOfferInput {
            current_offer_price: "3".to_string(),
            auction_house: AuctionHouseAccounts {
                address: Pubkey::new_unique(),
                authority: Pubkey::new_unique(),
                fee_account: Pubkey::new_unique(),
                treasury_mint: Pubkey::new_unique(),
            },
            token_mint: Pubkey::new_unique(),
            metadata: Pubkey::new_unique(),
            associated_token_account: Pubkey::new_unique(),
            buyer: None,
            address_lookup_table: Pubkey::new_unique(),
        };

        let builder = build(&pdas, &input, &buyer, None).unwrap();
        assert_eq!(builder.keys(), vec!["closeOffer"]);

        let expected = buyer_trade_state(
            &pdas,
            &buyer.pubkey(),
            &input.auction_house,
            &input.token_mint,
            3_000_000_000,
        )
        .unwrap();
        let ix = &builder.records()[0].instruction;
        assert_eq!(ix.accounts[12].pubkey, expected.address);
        assert_eq!(ix.accounts[4].pubkey, buyer.pubkey());
    }
}
