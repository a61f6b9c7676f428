#![allow(dead_code)]
//! Test Helper Utilities
//!
//! Scripted in-memory host plus market fixtures shared by the pipeline,
//! ordering and v0 compatibility tests.

use async_trait::async_trait;
use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::AccountMeta,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use solana_transaction_status::TransactionConfirmationStatus;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::RewardCenterClient;
use crate::host::{
    BlockhashInfo, ChainRpc, ConfirmationResponse, DynSigner, Identity, ProgramRegistry,
    TransactionConfirmer,
};
use crate::operations::{
    AcceptOfferInput, AuctionHouseAccounts, BuyInput, CancelOfferInput, CloseListingInput,
    CreateListingInput, MakeOfferInput, UpdateListingInput, UpdateOfferInput,
};
use crate::tx_builder::{
    CancellationHandle, RewardCenterError, RewardCenterResult, TransactionBuilder,
};

pub const CONFIRMED_SLOT: u64 = 4242;
pub const LAST_VALID_BLOCK_HEIGHT: u64 = 1_000;

/// In-memory chain host
///
/// Accounts "exist" when registered, lookup tables are served from a map,
/// and every broadcast transaction is recorded for inspection.
pub struct MockHost {
    blockhash: Hash,
    existing: Mutex<HashSet<Pubkey>>,
    lookup_tables: Mutex<HashMap<Pubkey, AddressLookupTableAccount>>,
    reject_next: Mutex<Option<String>>,
    cancel_during_confirm: Mutex<Option<CancellationHandle>>,
    expire_confirmation: Mutex<bool>,
    sent: Mutex<Vec<VersionedTransaction>>,
    blockhash_requests: AtomicU64,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            existing: Mutex::new(HashSet::new()),
            lookup_tables: Mutex::new(HashMap::new()),
            reject_next: Mutex::new(None),
            cancel_during_confirm: Mutex::new(None),
            expire_confirmation: Mutex::new(false),
            sent: Mutex::new(Vec::new()),
            blockhash_requests: AtomicU64::new(0),
        }
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn add_account(&self, address: Pubkey) {
        self.existing.lock().unwrap().insert(address);
    }

    pub fn add_lookup_table(&self, table: AddressLookupTableAccount) {
        self.lookup_tables.lock().unwrap().insert(table.key, table);
    }

    /// Reject the next broadcast with `reason`
    pub fn reject_next(&self, reason: &str) {
        *self.reject_next.lock().unwrap() = Some(reason.to_string());
    }

    /// Trip `handle` while the confirmation wait is in progress
    pub fn cancel_during_confirm(&self, handle: CancellationHandle) {
        *self.cancel_during_confirm.lock().unwrap() = Some(handle);
    }

    pub fn expire_confirmation(&self) {
        *self.expire_confirmation.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<VersionedTransaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn blockhash_requests(&self) -> u64 {
        self.blockhash_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for MockHost {
    async fn latest_blockhash(
        &self,
        _commitment: CommitmentConfig,
    ) -> RewardCenterResult<BlockhashInfo> {
        self.blockhash_requests.fetch_add(1, Ordering::SeqCst);
        Ok(BlockhashInfo {
            blockhash: self.blockhash,
            last_valid_block_height: LAST_VALID_BLOCK_HEIGHT,
        })
    }

    async fn address_lookup_table(
        &self,
        address: &Pubkey,
    ) -> RewardCenterResult<Option<AddressLookupTableAccount>> {
        Ok(self.lookup_tables.lock().unwrap().get(address).cloned())
    }

    async fn account_exists(&self, address: &Pubkey) -> RewardCenterResult<bool> {
        Ok(self.existing.lock().unwrap().contains(address))
    }

    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> RewardCenterResult<Signature> {
        if let Some(reason) = self.reject_next.lock().unwrap().take() {
            return Err(RewardCenterError::rejected(reason));
        }
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

#[async_trait]
impl TransactionConfirmer for MockHost {
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        _commitment: CommitmentConfig,
    ) -> RewardCenterResult<ConfirmationResponse> {
        if let Some(handle) = self.cancel_during_confirm.lock().unwrap().take() {
            handle.cancel();
        }
        if *self.expire_confirmation.lock().unwrap() {
            return Err(RewardCenterError::ConfirmationTimeout {
                signature: signature.to_string(),
                last_valid_block_height: blockhash.last_valid_block_height,
            });
        }
        Ok(ConfirmationResponse {
            signature: *signature,
            slot: CONFIRMED_SLOT,
            confirmation_status: Some(TransactionConfirmationStatus::Finalized),
        })
    }
}

/// Client wired to `host` with `wallet` as the ambient identity
pub fn client_for(host: &Arc<MockHost>, wallet: &DynSigner) -> RewardCenterClient {
    RewardCenterClient::new(
        host.clone(),
        host.clone(),
        Identity::new(wallet.clone()),
        ProgramRegistry::default(),
    )
}

pub fn new_signer() -> DynSigner {
    Arc::new(Keypair::new())
}

/// Lookup table holding every non-signer account the builder touches
pub fn lookup_table_for<C>(
    address: Pubkey,
    builder: &TransactionBuilder<C>,
) -> AddressLookupTableAccount {
    let mut addresses: Vec<Pubkey> = Vec::new();
    for ix in builder.instructions() {
        for meta in ix.accounts.iter().filter(|m| !m.is_signer) {
            if !addresses.contains(&meta.pubkey) {
                addresses.push(meta.pubkey);
            }
        }
    }
    AddressLookupTableAccount {
        key: address,
        addresses,
    }
}

/// Keys describing one NFT listed on one auction house
#[derive(Clone)]
pub struct MarketFixture {
    pub auction_house: AuctionHouseAccounts,
    pub auction_house_treasury: Pubkey,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    pub seller_token_account: Pubkey,
    pub reward_center_token: Pubkey,
    pub address_lookup_table: Pubkey,
}

impl MarketFixture {
    pub fn new() -> Self {
        Self {
            auction_house: AuctionHouseAccounts {
                address: Pubkey::new_unique(),
                authority: Pubkey::new_unique(),
                fee_account: Pubkey::new_unique(),
                treasury_mint: spl_token::native_mint::ID,
            },
            auction_house_treasury: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            metadata: Pubkey::new_unique(),
            seller_token_account: Pubkey::new_unique(),
            reward_center_token: Pubkey::new_unique(),
            address_lookup_table: Pubkey::new_unique(),
        }
    }

    pub fn creators(count: usize) -> Vec<AccountMeta> {
        (0..count)
            .map(|_| AccountMeta::new(Pubkey::new_unique(), false))
            .collect()
    }

    pub fn create_listing(&self, amount: &str) -> CreateListingInput {
        CreateListingInput {
            amount: amount.to_string(),
            auction_house: self.auction_house,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            reward_center_token: self.reward_center_token,
            seller: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn update_listing(&self, amount: &str) -> UpdateListingInput {
        UpdateListingInput {
            amount: amount.to_string(),
            auction_house: self.auction_house.address,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            seller: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn close_listing(&self) -> CloseListingInput {
        CloseListingInput {
            auction_house: self.auction_house,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            seller: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn make_offer(&self, amount: &str) -> MakeOfferInput {
        MakeOfferInput {
            amount: amount.to_string(),
            auction_house: self.auction_house,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            reward_center_token: self.reward_center_token,
            buyer: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn cancel_offer(&self, current: &str) -> CancelOfferInput {
        CancelOfferInput {
            current_offer_price: current.to_string(),
            auction_house: self.auction_house,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            buyer: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn update_offer(&self, current: &str, new: &str) -> UpdateOfferInput {
        UpdateOfferInput {
            current_offer_price: current.to_string(),
            new_offer_price: new.to_string(),
            auction_house: self.auction_house,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            buyer: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn accept_offer(
        &self,
        amount: &str,
        offer_buyer: Pubkey,
        creators: Vec<AccountMeta>,
    ) -> AcceptOfferInput {
        AcceptOfferInput {
            amount: amount.to_string(),
            auction_house: self.auction_house,
            auction_house_treasury: self.auction_house_treasury,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            reward_center_token: self.reward_center_token,
            offer_buyer,
            creators,
            seller: None,
            address_lookup_table: self.address_lookup_table,
        }
    }

    pub fn buy(
        &self,
        listed_price: &str,
        seller: Pubkey,
        seller_trade_state: Pubkey,
        seller_trade_state_bump: u8,
        creators: Vec<AccountMeta>,
    ) -> BuyInput {
        BuyInput {
            listed_price: listed_price.to_string(),
            auction_house: self.auction_house,
            auction_house_treasury: self.auction_house_treasury,
            token_mint: self.token_mint,
            metadata: self.metadata,
            associated_token_account: self.seller_token_account,
            reward_center_token: self.reward_center_token,
            seller,
            seller_trade_state,
            seller_trade_state_bump,
            creators,
            buyer: None,
            address_lookup_table: self.address_lookup_table,
        }
    }
}

/// Pubkey of a signer handle
pub fn key(signer: &DynSigner) -> Pubkey {
    signer.pubkey()
}
