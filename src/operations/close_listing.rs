//! Withdraw a listing

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

use crate::host::DynSigner;
use crate::operations::{trade_state_seeds, AuctionHouseAccounts, Operation, OperationEnv};
use crate::pdas::RewardCenterPdas;
use crate::program::{self, CloseListingAccounts};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct CloseListingInput {
    pub auction_house: AuctionHouseAccounts,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    pub associated_token_account: Pubkey,
    pub seller: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

/// Record closing `seller`'s listing and the auctioneer trade state it holds
pub(crate) fn close_listing_record(
    pdas: &RewardCenterPdas,
    seller: &DynSigner,
    auction_house: &AuctionHouseAccounts,
    token_account: Pubkey,
    token_mint: Pubkey,
    metadata: Pubkey,
) -> RewardCenterResult<InstructionRecord> {
    let seller_key = seller.pubkey();
    let ah = auction_house;

    let seller_trade_state = pdas.auctioneer_trade_state_address(trade_state_seeds(
        &seller_key,
        ah,
        &token_account,
        &token_mint,
    ))?;
    let reward_center = pdas.reward_center(&ah.address)?.address;
    let listing = pdas.listing_address(&seller_key, &metadata, &reward_center)?;
    let auctioneer = pdas.auctioneer_address(&ah.address, &reward_center)?;

    let accounts = CloseListingAccounts {
        wallet: seller_key,
        listing: listing.address,
        reward_center,
        metadata,
        token_account,
        token_mint,
        authority: ah.authority,
        auction_house: ah.address,
        auction_house_fee_account: ah.fee_account,
        trade_state: seller_trade_state.address,
        ah_auctioneer_pda: auctioneer.address,
    };

    Ok(InstructionRecord::new(
        program::close_listing(pdas.programs(), &accounts)?,
        vec![seller.clone()],
        "closeListing",
    ))
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &CloseListingInput,
    seller: &DynSigner,
    payer: Option<DynSigner>,
) -> RewardCenterResult<TransactionBuilder<()>> {
    let mut builder = TransactionBuilder::new(()).set_fee_payer(payer);
    builder.add(close_listing_record(
        pdas,
        seller,
        &input.auction_house,
        input.associated_token_account,
        input.token_mint,
        input.metadata,
    )?);
    Ok(builder)
}

#[async_trait]
impl Operation for CloseListingInput {
    type Context = ();
    const NAME: &'static str = "close_listing";
    const SIGNER_ROLE: &'static str = "seller";

    fn address_lookup_table(&self) -> &Pubkey {
        &self.address_lookup_table
    }

    fn signer(&self) -> Option<&DynSigner> {
        self.seller.as_ref()
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
