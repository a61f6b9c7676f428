//! List an NFT for sale through the reward center

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use tracing::debug;

use crate::constants::TOKEN_SIZE;
use crate::host::DynSigner;
use crate::operations::{
    create_token_account_record, token_account, trade_state_seeds, AuctionHouseAccounts,
    Operation, OperationEnv,
};
use crate::pdas::RewardCenterPdas;
use crate::price::to_base_units;
use crate::program::{self, CreateListingAccounts, CreateListingParams};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct CreateListingInput {
    /// Asking price as a decimal string
    pub amount: String,
    pub auction_house: AuctionHouseAccounts,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    /// Seller's token account holding the NFT
    pub associated_token_account: Pubkey,
    pub reward_center_token: Pubkey,
    pub seller: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingContext {
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub listing_address: Pubkey,
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub seller_trade_state: Pubkey,
    pub trade_state_bump: u8,
    /// Listed price in base units
    pub buyer_price: String,
}

/// Assemble the create-listing instruction list
pub fn build(
    pdas: &RewardCenterPdas,
    input: &CreateListingInput,
    seller: &DynSigner,
    payer: Option<DynSigner>,
    seller_reward_account_exists: bool,
) -> RewardCenterResult<TransactionBuilder<CreateListingContext>> {
    let price = to_base_units(&input.amount)?;
    let seller_key = seller.pubkey();
    let ah = &input.auction_house;

    let seeds = trade_state_seeds(
        &seller_key,
        ah,
        &input.associated_token_account,
        &input.token_mint,
    );
    let seller_trade_state = pdas.auctioneer_trade_state_address(seeds)?;
    let free_seller_trade_state = pdas.trade_state(seeds, 0)?;
    let program_as_signer = pdas.program_as_signer()?;
    let reward_center = pdas.reward_center(&ah.address)?.address;
    let listing = pdas.listing_address(&seller_key, &input.metadata, &reward_center)?;
    let auctioneer = pdas.auctioneer_address(&ah.address, &reward_center)?;

    let accounts = CreateListingAccounts {
        wallet: seller_key,
        listing: listing.address,
        reward_center,
        token_account: input.associated_token_account,
        metadata: input.metadata,
        authority: ah.authority,
        auction_house: ah.address,
        auction_house_fee_account: ah.fee_account,
        seller_trade_state: seller_trade_state.address,
        free_seller_trade_state: free_seller_trade_state.address,
        ah_auctioneer_pda: auctioneer.address,
        program_as_signer: program_as_signer.address,
    };
    let params = CreateListingParams {
        trade_state_bump: seller_trade_state.bump,
        free_trade_state_bump: free_seller_trade_state.bump,
        program_as_signer_bump: program_as_signer.bump,
        price,
        token_size: TOKEN_SIZE,
    };

    let mut builder = TransactionBuilder::new(CreateListingContext {
        listing_address: listing.address,
        seller_trade_state: seller_trade_state.address,
        trade_state_bump: seller_trade_state.bump,
        buyer_price: price.to_string(),
    })
    .set_fee_payer(payer);

    if !seller_reward_account_exists {
        builder.add(create_token_account_record(seller, &input.reward_center_token, "sellerATA"));
    }
    builder.add(InstructionRecord::new(
        program::create_listing(pdas.programs(), &accounts, params)?,
        vec![seller.clone()],
        "createListing",
    ));

    Ok(builder)
}

#[async_trait]
impl Operation for CreateListingInput {
    type Context = CreateListingContext;
    const NAME: &'static str = "create_listing";
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
        let reward_account = token_account(&signer.pubkey(), &self.reward_center_token);
        let exists = env.rpc.account_exists(&reward_account).await?;
        debug!(account = %reward_account, exists, "Seller reward token account probe");
        build(env.pdas, self, &signer, payer, exists)
    }
}
