//! Buy a listed NFT at its listed price

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
use crate::program::{self, BuyListingParams, SettlementAccounts};
use crate::tx_builder::{
    compute_unit_limit_record, InstructionRecord, RewardCenterResult, TransactionBuilder,
};

#[derive(Clone)]
pub struct BuyInput {
    /// Listed price as a decimal string
    pub listed_price: String,
    pub auction_house: AuctionHouseAccounts,
    pub auction_house_treasury: Pubkey,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    /// Seller's token account holding the NFT
    pub associated_token_account: Pubkey,
    pub reward_center_token: Pubkey,
    pub seller: Pubkey,
    pub seller_trade_state: Pubkey,
    pub seller_trade_state_bump: u8,
    pub creators: Vec<AccountMeta>,
    pub buyer: Option<DynSigner>,
    pub address_lookup_table: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyContext {
    #[serde(serialize_with = "crate::tx_builder::output::serialize_pubkey")]
    pub buyer_receipt_token_account: Pubkey,
}

pub fn build(
    pdas: &RewardCenterPdas,
    input: &BuyInput,
    buyer: &DynSigner,
    payer: Option<DynSigner>,
    compute_unit_limit: u32,
    buyer_reward_account_exists: bool,
) -> RewardCenterResult<TransactionBuilder<BuyContext>> {
    let price = to_base_units(&input.listed_price)?;
    let buyer_key = buyer.pubkey();
    let ah = &input.auction_house;
    let mint = &input.token_mint;

    let buyer_trade_state = pdas.trade_state(trade_state_seeds(&buyer_key, ah, mint, mint), price)?;
    let escrow_payment_account = pdas.buyer_escrow(&ah.address, &buyer_key)?;
    let program_as_signer = pdas.program_as_signer()?;
    let free_seller_trade_state = pdas.trade_state(
        trade_state_seeds(&input.seller, ah, &input.associated_token_account, mint),
        0,
    )?;
    let reward_center = pdas.reward_center(&ah.address)?.address;
    let listing = pdas.listing_address(&input.seller, &input.metadata, &reward_center)?.address;
    let auctioneer = pdas.auctioneer_address(&ah.address, &reward_center)?.address;

    let reward_mint = &input.reward_center_token;
    let buyer_receipt_token_account = token_account(&buyer_key, mint);

    let accounts = SettlementAccounts {
        buyer: buyer_key,
        buyer_reward_token_account: token_account(&buyer_key, reward_mint),
        seller: input.seller,
        seller_reward_token_account: token_account(&input.seller, reward_mint),
        token_account: input.associated_token_account,
        token_mint: input.token_mint,
        metadata: input.metadata,
        treasury_mint: ah.treasury_mint,
        seller_payment_receipt_account: input.seller,
        buyer_receipt_token_account,
        authority: ah.authority,
        escrow_payment_account: escrow_payment_account.address,
        auction_house: ah.address,
        auction_house_fee_account: ah.fee_account,
        auction_house_treasury: input.auction_house_treasury,
        buyer_trade_state: buyer_trade_state.address,
        seller_trade_state: input.seller_trade_state,
        free_seller_trade_state: free_seller_trade_state.address,
        reward_center,
        reward_center_reward_token_account: token_account(&reward_center, reward_mint),
        ah_auctioneer_pda: auctioneer,
        program_as_signer: program_as_signer.address,
    };
    let params = BuyListingParams {
        escrow_payment_bump: escrow_payment_account.bump,
        free_trade_state_bump: free_seller_trade_state.bump,
        seller_trade_state_bump: input.seller_trade_state_bump,
        program_as_signer_bump: program_as_signer.bump,
        buyer_trade_state_bump: buyer_trade_state.bump,
    };

    let mut builder = TransactionBuilder::new(BuyContext {
        buyer_receipt_token_account,
    })
    .set_fee_payer(payer);

    builder.add(compute_unit_limit_record(
        compute_unit_limit,
        buyer.clone(),
        "computeUnitLimit",
    ));
    if !buyer_reward_account_exists {
        builder.add(create_token_account_record(buyer, reward_mint, "buyerATA"));
    }
    builder.add(InstructionRecord::new(
        program::buy_listing(pdas.programs(), listing, &accounts, params, &input.creators)?,
        vec![buyer.clone()],
        "buyListing",
    ));

    Ok(builder)
}

#[async_trait]
impl Operation for BuyInput {
    type Context = BuyContext;
    const NAME: &'static str = "buy";
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
        build(env.pdas, self, &signer, payer, env.compute_unit_limit, exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::discriminator;
    use solana_sdk::signature::Keypair;
    use std::sync::Arc;

    fn input(creators: Vec<AccountMeta>) -> BuyInput {
        BuyInput {
            listed_price: "0.5".to_string(),
            auction_house: AuctionHouseAccounts {
                address: Pubkey::new_unique(),
                authority: Pubkey::new_unique(),
                fee_account: Pubkey::new_unique(),
                treasury_mint: Pubkey::new_unique(),
            },
            auction_house_treasury: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            metadata: Pubkey::new_unique(),
            associated_token_account: Pubkey::new_unique(),
            reward_center_token: Pubkey::new_unique(),
            seller: Pubkey::new_unique(),
            seller_trade_state: Pubkey::new_unique(),
            seller_trade_state_bump: 251,
            creators,
            buyer: None,
            address_lookup_table: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_buy_pipeline_order() {
        let pdas = RewardCenterPdas::default();
        let buyer: DynSigner = Arc::new(Keypair::new());

        let builder = build(&pdas, &input(vec![]), &buyer, None, 400_000, false).unwrap();
        assert_eq!(builder.keys(), vec!["computeUnitLimit", "buyerATA", "buyListing"]);

        let builder = build(&pdas, &input(vec![]), &buyer, None, 400_000, true).unwrap();
        assert_eq!(builder.keys(), vec!["computeUnitLimit", "buyListing"]);
    }

    #[test]
    fn test_buy_listing_accounts_and_bumps() {
        let pdas = RewardCenterPdas::default();
        let buyer: DynSigner = Arc::new(Keypair::new());
        let creators = vec![
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
        ];
        let input = input(creators.clone());

        let builder = build(&pdas, &input, &buyer, None, 400_000, true).unwrap();
        let ix = &builder.records()[1].instruction;
        assert_eq!(&ix.data[..8], &discriminator("buy_listing"));
        assert_eq!(ix.data[10], 251);
        assert_eq!(&ix.accounts[ix.accounts.len() - 3..], &creators[..]);

        let reward_center = pdas.reward_center(&input.auction_house.address).unwrap().address;
        let listing = pdas
            .listing_address(&input.seller, &input.metadata, &reward_center)
            .unwrap();
        assert_eq!(ix.accounts[6].pubkey, listing.address);
        assert!(ix.accounts[0].is_signer);
    }
}
