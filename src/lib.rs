//! Reward Center Marketplace Client Library
//!
//! Builds, signs and submits reward center marketplace transactions on Solana:
//! program-derived address derivation, instruction assembly for listing,
//! offer and settlement operations, and v0 transaction composition against an
//! address lookup table.

pub mod client;
pub mod compat;
pub mod config;
pub mod constants;
pub mod host;
pub mod operations;
pub mod pdas;
pub mod price;
pub mod program;
pub mod structured_logging;
pub mod tx_builder;
pub mod wallet;

pub use client::RewardCenterClient;
pub use host::{
    BlockhashInfo, ChainRpc, ConfirmationResponse, DynSigner, Identity, ProgramRegistry,
    SolanaRpcHost, TransactionConfirmer,
};
pub use operations::{AuctionHouseAccounts, Operation};
pub use pdas::{Pda, RewardCenterPdas, TradeStateSeeds};
pub use tx_builder::{
    CancellationHandle, OperationOptions, OperationOutput, RewardCenterError, RewardCenterResult,
};

// Re-export commonly used types
pub use solana_sdk::{message::VersionedMessage, pubkey::Pubkey, signature::Signature};

#[cfg(test)]
mod tests {
    mod instruction_ordering_tests;
    mod operation_pipeline_tests;
    mod test_helpers;
    mod v0_transaction_compat_tests;
}
