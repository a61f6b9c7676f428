//! Host capabilities injected into every operation
//!
//! The chain connection, the confirmation primitive, the program registry and
//! the ambient identity are passed in explicitly rather than read from shared
//! global state. [`SolanaRpcHost`] is the live implementation; tests supply
//! their own.

use async_trait::async_trait;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    address_lookup_table::{state::AddressLookupTable, AddressLookupTableAccount},
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::{TransactionError, VersionedTransaction},
};
use solana_transaction_status::{TransactionConfirmationStatus, UiTransactionEncoding};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::{AUCTION_HOUSE_PROGRAM_ID, REWARD_CENTER_PROGRAM_ID};
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

/// Shared, thread-safe signer handle
pub type DynSigner = Arc<dyn Signer + Send + Sync>;

/// Program ids used to scope derivations and instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramRegistry {
    pub reward_center: Pubkey,
    pub auction_house: Pubkey,
}

impl Default for ProgramRegistry {
    fn default() -> Self {
        Self {
            reward_center: REWARD_CENTER_PROGRAM_ID,
            auction_house: AUCTION_HOUSE_PROGRAM_ID,
        }
    }
}

/// Ambient identity and default fee payer, resolved once at the call boundary
#[derive(Clone, Default)]
pub struct Identity {
    pub signer: Option<DynSigner>,
    pub fee_payer: Option<DynSigner>,
}

impl Identity {
    /// Identity that signs and pays with the same key
    pub fn new(signer: DynSigner) -> Self {
        Self {
            signer: Some(signer.clone()),
            fee_payer: Some(signer),
        }
    }

    /// Explicit signer if supplied, otherwise the ambient identity
    pub fn resolve_signer(
        &self,
        explicit: Option<&DynSigner>,
        role: &'static str,
    ) -> RewardCenterResult<DynSigner> {
        explicit
            .or(self.signer.as_ref())
            .cloned()
            .ok_or(RewardCenterError::MissingSigner(role))
    }

    /// Explicit payer if supplied, otherwise the default fee payer
    pub fn resolve_fee_payer(&self, explicit: Option<&DynSigner>) -> Option<DynSigner> {
        explicit.or(self.fee_payer.as_ref()).cloned()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("signer", &self.signer.as_ref().map(|s| s.pubkey()))
            .field("fee_payer", &self.fee_payer.as_ref().map(|s| s.pubkey()))
            .finish()
    }
}

/// Latest blockhash and the block height bound it stays valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashInfo {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// What the confirmation primitive reports for a landed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResponse {
    pub signature: Signature,
    pub slot: u64,
    pub confirmation_status: Option<TransactionConfirmationStatus>,
}

/// Read and broadcast access to the chain
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Fetch the latest blockhash and its validity bound
    async fn latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> RewardCenterResult<BlockhashInfo>;

    /// Fetch and decode an address lookup table, `None` if no account exists
    async fn address_lookup_table(
        &self,
        address: &Pubkey,
    ) -> RewardCenterResult<Option<AddressLookupTableAccount>>;

    /// Whether an account exists at `address`
    async fn account_exists(&self, address: &Pubkey) -> RewardCenterResult<bool>;

    /// Broadcast a signed transaction without waiting for confirmation
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> RewardCenterResult<Signature>;
}

/// Blocking wait for a transaction to reach a commitment level
#[async_trait]
pub trait TransactionConfirmer: Send + Sync {
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        commitment: CommitmentConfig,
    ) -> RewardCenterResult<ConfirmationResponse>;
}

/// Live host over the nonblocking Solana RPC client
pub struct SolanaRpcHost {
    client: Arc<RpcClient>,
    poll_interval: Duration,
}

impl SolanaRpcHost {
    pub fn new(url: String, commitment: CommitmentConfig, poll_interval: Duration) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_commitment(url, commitment)),
            poll_interval,
        }
    }

    pub fn from_client(client: Arc<RpcClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

fn map_client_error(err: ClientError) -> RewardCenterError {
    match err.get_transaction_error() {
        Some(tx_err) => RewardCenterError::rejected(tx_err.to_string()),
        None => RewardCenterError::rpc(err.to_string()),
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcHost {
    async fn latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> RewardCenterResult<BlockhashInfo> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(commitment)
            .await
            .map_err(map_client_error)?;
        Ok(BlockhashInfo {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn address_lookup_table(
        &self,
        address: &Pubkey,
    ) -> RewardCenterResult<Option<AddressLookupTableAccount>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(map_client_error)?;
        let Some(account) = response.value else {
            return Ok(None);
        };
        let table = AddressLookupTable::deserialize(&account.data).map_err(|e| {
            RewardCenterError::LookupTableNotFound(format!(
                "{} is not a lookup table: {}",
                address, e
            ))
        })?;
        Ok(Some(AddressLookupTableAccount {
            key: *address,
            addresses: table.addresses.to_vec(),
        }))
    }

    async fn account_exists(&self, address: &Pubkey) -> RewardCenterResult<bool> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(map_client_error)?;
        Ok(response.value.is_some())
    }

    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> RewardCenterResult<Signature> {
        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(self.client.commitment().commitment),
            encoding: Some(UiTransactionEncoding::Base64),
            ..RpcSendTransactionConfig::default()
        };
        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(map_client_error)
    }
}

#[async_trait]
impl TransactionConfirmer for SolanaRpcHost {
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
        commitment: CommitmentConfig,
    ) -> RewardCenterResult<ConfirmationResponse> {
        loop {
            let statuses = self
                .client
                .get_signature_statuses(&[*signature])
                .await
                .map_err(map_client_error)?;

            if let Some(Some(status)) = statuses.value.into_iter().next() {
                if let Some(err) = status.err {
                    return Err(rejection(err));
                }
                if status.satisfies_commitment(commitment) {
                    return Ok(ConfirmationResponse {
                        signature: *signature,
                        slot: status.slot,
                        confirmation_status: status.confirmation_status,
                    });
                }
                debug!(signature = %signature, slot = status.slot, "Awaiting commitment");
            }

            let block_height = self
                .client
                .get_block_height_with_commitment(commitment)
                .await
                .map_err(map_client_error)?;
            if block_height > blockhash.last_valid_block_height {
                warn!(
                    signature = %signature,
                    block_height,
                    last_valid_block_height = blockhash.last_valid_block_height,
                    "Blockhash expired before confirmation"
                );
                return Err(RewardCenterError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    last_valid_block_height: blockhash.last_valid_block_height,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn rejection(err: TransactionError) -> RewardCenterError {
    RewardCenterError::rejected(err.to_string())
}
