//! Per-call options and cancellation scope
//!
//! [`OperationOptions`] is the optional scope value every facade method takes:
//! an explicit fee payer, a commitment override and a cancellation handle.
//! Cancellation is cooperative; it is observed before broadcast (nothing is
//! sent) and after confirmation (the transaction has already landed and is
//! not rolled back).

use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::host::DynSigner;
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

/// Cloneable cancellation flag shared between a caller and an operation
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    canceled: Arc<AtomicBool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Fail with `OperationCanceled` if cancellation was requested
    pub fn throw_if_canceled(&self, broadcast: bool) -> RewardCenterResult<()> {
        if self.is_canceled() {
            return Err(RewardCenterError::OperationCanceled { broadcast });
        }
        Ok(())
    }
}

/// Optional scope for a single operation call
#[derive(Clone, Default)]
pub struct OperationOptions {
    /// Fee payer overriding the host default
    pub payer: Option<DynSigner>,
    /// Commitment overriding the client default
    pub commitment: Option<CommitmentConfig>,
    pub cancellation: CancellationHandle,
}

impl OperationOptions {
    pub fn with_payer(mut self, payer: DynSigner) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = Some(commitment);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationHandle) -> Self {
        self.cancellation = cancellation;
        self
    }
}

impl std::fmt::Debug for OperationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationOptions")
            .field("payer", &self.payer.as_ref().map(|p| p.pubkey()))
            .field("commitment", &self.commitment)
            .field("canceled", &self.cancellation.is_canceled())
            .finish()
    }
}
