//! Seller accepts a buyer's open offer
//!
//! Pipeline: raise the compute unit limit, close the seller's listing when one
//! exists on chain, create the seller's reward token account when missing,
//! then settle. Creator accounts are appended to the settlement instruction
//! in the order supplied.

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, signer::Signer};
use tracing::debug;

use crate::host::DynSigner;
use crate::operations::{
    create_token_account_record, token_account, trade_state_seeds, AuctionHouseAccounts,
    Operation, OperationEnv,
};
use crate::pdas::RewardCenterPdas;
use crate::price::to_base_units;
use crate::operations::close_listing::close_listing_record;
use crate::program::{self, AcceptOfferParams, SettlementAccounts};
use crate::tx_builder::{
    compute_unit_limit_record, InstructionRecord, RewardCenterResult, TransactionBuilder,
};

#[derive(Clone)]
pub struct AcceptOfferInput {
    /// Offer price as a decimal string
    pub amount: String,
    pub auction_house: AuctionHouseAccounts,
    pub auction_house_treasury: Pubkey,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    /// Seller's token account holding the NFT
    pub associated_token_account: Pubkey,
    pub reward_center_token: Pubkey,
    pub offer_buyer: Pubkey,
    pub creators: Vec<AccountMeta>,
    pub seller: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOfferContext {
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub buyer_trade_state: Pubkey,
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub metadata: Pubkey,
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub buyer_receipt_token_account: Pubkey,
}

/// Results of the account-existence probes accept-offer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptOfferProbes {
    pub listing_exists: bool,
    pub seller_reward_account_exists: bool,
}

fn listing_address(
    pdas: &RewardCenterPdas,
    input: &AcceptOfferInput,
    seller: &Pubkey,
) -> RewardCenterResult<Pubkey> {
    let reward_center = pdas.reward_center(&input.auction_house.address)?.address;
    Ok(pdas.listing_address(seller, &input.metadata, &reward_center)?.address)
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &AcceptOfferInput,
    seller: &DynSigner,
    payer: Option<DynSigner>,
    compute_unit_limit: u32,
    probes: AcceptOfferProbes,
) -> RewardCenterResult<TransactionBuilder<AcceptOfferContext>> {
    let buyer_price = to_base_units(&input.amount)?;
    let seller_key = seller.pubkey();
    let buyer_key = input.offer_buyer;
    let ah = &input.auction_house;
    let mint = &input.token_mint;

    let escrow_payment_account = pdas.buyer_escrow(&ah.address, &buyer_key)?;
    let buyer_trade_state =
        pdas.trade_state(trade_state_seeds(&buyer_key, ah, mint, mint), buyer_price)?;
    let seller_trade_state =
        pdas.trade_state(trade_state_seeds(&seller_key, ah, mint, mint), buyer_price)?;
    let free_seller_trade_state = pdas.trade_state(
        trade_state_seeds(&seller_key, ah, &input.associated_token_account, mint),
        0,
    )?;
    let program_as_signer = pdas.program_as_signer()?;
    let reward_center = pdas.reward_center(&ah.address)?.address;
    let offer = pdas.offer_address(&buyer_key, &input.metadata, &reward_center)?.address;
    let auctioneer = pdas.auctioneer_address(&ah.address, &reward_center)?.address;

    let reward_mint = &input.reward_center_token;
    let buyer_receipt_token_account = token_account(&buyer_key, mint);
    let seller_reward_token_account = token_account(&seller_key, reward_mint);

    let accounts = SettlementAccounts {
        buyer: buyer_key,
        buyer_reward_token_account: token_account(&buyer_key, reward_mint),
        seller: seller_key,
        seller_reward_token_account,
        token_account: input.associated_token_account,
        token_mint: input.token_mint,
        metadata: input.metadata,
        treasury_mint: ah.treasury_mint,
        seller_payment_receipt_account: seller_key,
        buyer_receipt_token_account,
        authority: ah.authority,
        escrow_payment_account: escrow_payment_account.address,
        auction_house: ah.address,
        auction_house_fee_account: ah.fee_account,
        auction_house_treasury: input.auction_house_treasury,
        buyer_trade_state: buyer_trade_state.address,
        seller_trade_state: seller_trade_state.address,
        free_seller_trade_state: free_seller_trade_state.address,
        reward_center,
        reward_center_reward_token_account: token_account(&reward_center, reward_mint),
        ah_auctioneer_pda: auctioneer,
        program_as_signer: program_as_signer.address,
    };
    let params = AcceptOfferParams {
        escrow_payment_bump: escrow_payment_account.bump,
        free_trade_state_bump: free_seller_trade_state.bump,
        seller_trade_state_bump: seller_trade_state.bump,
        program_as_signer_bump: program_as_signer.bump,
        buyer_trade_state_bump: buyer_trade_state.bump,
    };

    let mut builder = TransactionBuilder::new(AcceptOfferContext {
        buyer_trade_state: buyer_trade_state.address,
        metadata: input.metadata,
        buyer_receipt_token_account,
    })
    .set_fee_payer(payer);

    builder.add(compute_unit_limit_record(
        compute_unit_limit,
        seller.clone(),
        "computeUnitLimit",
    ));

    // Same trade state a standalone close-listing releases
    if probes.listing_exists {
        builder.add(close_listing_record(
            pdas,
            seller,
            ah,
            input.associated_token_account,
            input.token_mint,
            input.metadata,
        )?);
    }

    if !probes.seller_reward_account_exists {
        builder.add(create_token_account_record(seller, reward_mint, "sellerATA"));
    }

    builder.add(InstructionRecord::new(
        program::accept_offer(pdas.programs(), offer, &accounts, params, &input.creators)?,
        vec![seller.clone()],
        "acceptOffer",
    ));

    Ok(builder)
}

#[async_trait]
impl Operation for AcceptOfferInput {
    type Context = AcceptOfferContext;
    const NAME: &'static str = "accept_offer";
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
        let seller_key = signer.pubkey();
        let listing = listing_address(env.pdas, self, &seller_key)?;
        let listing_exists = env.rpc.account_exists(&listing).await?;
        debug!(listing = %listing, listing_exists, "Seller listing probe");

        let reward_account = token_account(&seller_key, &self.reward_center_token);
        let seller_reward_account_exists = env.rpc.account_exists(&reward_account).await?;
        debug!(
            account = %reward_account,
            exists = seller_reward_account_exists,
            "Seller reward token account probe"
        );

        build(
            env.pdas,
            self,
            &signer,
            payer,
            env.compute_unit_limit,
            AcceptOfferProbes {
                listing_exists,
                seller_reward_account_exists,
            },
        )
    }
}
