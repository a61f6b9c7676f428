//! Place an offer on an NFT
//!
//! Offer-side trade states seed the token mint in the token-account position,
//! matching what the auction house program expects for bids.

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
use crate::pdas::{Pda, RewardCenterPdas};
use crate::price::to_base_units;
use crate::program::{self, CreateOfferAccounts, CreateOfferParams};
use crate::tx_builder::{InstructionRecord, RewardCenterResult, TransactionBuilder};

#[derive(Clone)]
pub struct MakeOfferInput {
    /// Offer price as a decimal string
    pub amount: String,
    pub auction_house: AuctionHouseAccounts,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    /// Token account currently holding the NFT
    pub associated_token_account: Pubkey,
    pub reward_center_token: Pubkey,
    pub buyer: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeOfferContext {
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub buyer_trade_state: Pubkey,
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub metadata: Pubkey,
    pub buyer_trade_state_bump: u8,
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub associated_token_account: Pubkey,
    pub buyer_price: u64,
}

/// Addresses shared by every offer-side instruction for one buyer
pub(crate) struct OfferAddresses {
    pub escrow_payment_account: Pda,
    pub reward_center: Pubkey,
    pub offer: Pubkey,
    pub auctioneer: Pubkey,
}

impl OfferAddresses {
    pub(crate) fn derive(
        pdas: &RewardCenterPdas,
        buyer: &Pubkey,
        auction_house: &Pubkey,
        metadata: &Pubkey,
    ) -> RewardCenterResult<Self> {
        let escrow_payment_account = pdas.buyer_escrow(auction_house, buyer)?;
        let reward_center = pdas.reward_center(auction_house)?.address;
        let offer = pdas.offer_address(buyer, metadata, &reward_center)?.address;
        let auctioneer = pdas.auctioneer_address(auction_house, &reward_center)?.address;
        Ok(Self {
            escrow_payment_account,
            reward_center,
            offer,
            auctioneer,
        })
    }
}

/// Buyer trade state at `price`
pub(crate) fn buyer_trade_state(
    pdas: &RewardCenterPdas,
    buyer: &Pubkey,
    auction_house: &AuctionHouseAccounts,
    token_mint: &Pubkey,
    price: u64,
) -> RewardCenterResult<Pda> {
    pdas.trade_state(trade_state_seeds(buyer, auction_house, token_mint, token_mint), price)
}

/// The `create_offer` record at `price` against `trade_state`
#[allow(clippy::too_many_arguments)]
pub(crate) fn create_offer_record(
    pdas: &RewardCenterPdas,
    buyer: &DynSigner,
    auction_house: &AuctionHouseAccounts,
    addresses: &OfferAddresses,
    trade_state: Pda,
    associated_token_account: Pubkey,
    metadata: Pubkey,
    price: u64,
    key: &'static str,
) -> RewardCenterResult<InstructionRecord> {
    let buyer_key = buyer.pubkey();
    let accounts = CreateOfferAccounts {
        wallet: buyer_key,
        offer: addresses.offer,
        payment_account: buyer_key,
        transfer_authority: buyer_key,
        treasury_mint: auction_house.treasury_mint,
        token_account: associated_token_account,
        metadata,
        escrow_payment_account: addresses.escrow_payment_account.address,
        authority: auction_house.authority,
        reward_center: addresses.reward_center,
        auction_house: auction_house.address,
        auction_house_fee_account: auction_house.fee_account,
        buyer_trade_state: trade_state.address,
        ah_auctioneer_pda: addresses.auctioneer,
    };
    let params = CreateOfferParams {
        trade_state_bump: trade_state.bump,
        escrow_payment_bump: addresses.escrow_payment_account.bump,
        buyer_price: price,
        token_size: TOKEN_SIZE,
    };
    Ok(InstructionRecord::new(
        program::create_offer(pdas.programs(), &accounts, params)?,
        vec![buyer.clone()],
        key,
    ))
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &MakeOfferInput,
    buyer: &DynSigner,
    payer: Option<DynSigner>,
    buyer_reward_account_exists: bool,
) -> RewardCenterResult<TransactionBuilder<MakeOfferContext>> {
    let buyer_price = to_base_units(&input.amount)?;
    let buyer_key = buyer.pubkey();
    let ah = &input.auction_house;

    let addresses = OfferAddresses::derive(pdas, &buyer_key, &ah.address, &input.metadata)?;
    let trade_state = buyer_trade_state(pdas, &buyer_key, ah, &input.token_mint, buyer_price)?;

    let mut builder = TransactionBuilder::new(MakeOfferContext {
        buyer_trade_state: trade_state.address,
        metadata: input.metadata,
        buyer_trade_state_bump: trade_state.bump,
        associated_token_account: input.associated_token_account,
        buyer_price,
    })
    .set_fee_payer(payer);

    if !buyer_reward_account_exists {
        builder.add(create_token_account_record(buyer, &input.reward_center_token, "buyerATA"));
    }
    builder.add(create_offer_record(
        pdas,
        buyer,
        ah,
        &addresses,
        trade_state,
        input.associated_token_account,
        input.metadata,
        buyer_price,
        "makeOffer",
    )?);

    Ok(builder)
}

#[async_trait]
impl Operation for MakeOfferInput {
    type Context = MakeOfferContext;
    const NAME: &'static str = "make_offer";
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
        let reward_account = token_account(&signer.pubkey(), &self.reward_center_token);
        let exists = env.rpc.account_exists(&reward_account).await?;
        debug!(account = %reward_account, exists, "Buyer reward token account probe");
        build(env.pdas, self, &signer, payer, exists)
    }
}
