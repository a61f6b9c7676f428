//! Error types for reward center operations
//!
//! One taxonomy covers the whole operation lifecycle: address derivation,
//! instruction assembly, transaction composition, submission and
//! confirmation. Nothing in this crate recovers from these errors locally;
//! every failure is surfaced to the immediate caller unmodified.

use thiserror::Error;

/// Error type for all reward center client operations
#[derive(Error, Debug)]
pub enum RewardCenterError {
    /// No bump seed in the probe range produced an off-curve address
    #[error("Address derivation exhausted for seed prefix '{seed}'")]
    DerivationExhausted {
        /// First seed of the tuple, used to name the derivation
        seed: String,
    },

    /// No explicit or ambient signer is available for a role
    #[error("Missing signer for role '{0}'")]
    MissingSigner(&'static str),

    /// Neither an explicit nor a default fee payer could be resolved
    #[error("Missing fee payer: no explicit payer and no default payer configured")]
    MissingFeePayer,

    /// The referenced address lookup table does not resolve to an account
    #[error("Address lookup table not found: {0}")]
    LookupTableNotFound(String),

    /// The network or program rejected the transaction
    ///
    /// The message is surfaced verbatim from the host with no local
    /// interpretation.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Confirmation did not arrive before the blockhash validity window closed
    #[error("Confirmation timeout for {signature}: block height exceeded {last_valid_block_height}")]
    ConfirmationTimeout {
        /// Signature of the unconfirmed transaction
        signature: String,
        /// Last block height at which the blockhash was valid
        last_valid_block_height: u64,
    },

    /// The operation scope was canceled
    ///
    /// When `broadcast` is true the transaction may already have landed.
    #[error("Operation canceled (broadcast: {broadcast})")]
    OperationCanceled {
        /// Whether the transaction had been sent before cancellation was observed
        broadcast: bool,
    },

    /// A price or amount string is not a valid non-negative decimal
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount {
        /// The raw user-supplied string
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The v0 message could not be compiled
    #[error("Message compile error: {0}")]
    MessageCompile(String),

    /// Signing failed or the signer set does not match the message
    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC transport error while fetching chain state
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Configuration or validation error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RewardCenterError {
    /// Whether retrying the whole operation might succeed
    ///
    /// `ConfirmationTimeout` is retryable only in the sense that the caller
    /// rebuilds the operation with a fresh blockhash; the signed transaction
    /// itself must never be resubmitted.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rpc(_) => true,
            Self::ConfirmationTimeout { .. } => true,

            Self::DerivationExhausted { .. } => false,
            Self::MissingSigner(_) => false,
            Self::MissingFeePayer => false,
            Self::LookupTableNotFound(_) => false,
            Self::SubmissionRejected(_) => false,
            Self::OperationCanceled { .. } => false,
            Self::InvalidAmount { .. } => false,
            Self::MessageCompile(_) => false,
            Self::Signing(_) => false,
            Self::Configuration(_) => false,
        }
    }

    /// Get the error category for structured logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::DerivationExhausted { .. } => "derivation",
            Self::MissingSigner(_) => "signer",
            Self::MissingFeePayer => "fee_payer",
            Self::LookupTableNotFound(_) => "lookup_table",
            Self::SubmissionRejected(_) => "submission",
            Self::ConfirmationTimeout { .. } => "confirmation",
            Self::OperationCanceled { .. } => "canceled",
            Self::InvalidAmount { .. } => "amount",
            Self::MessageCompile(_) => "compile",
            Self::Signing(_) => "signing",
            Self::Rpc(_) => "rpc",
            Self::Configuration(_) => "config",
        }
    }
}

// Convenience constructors for common error scenarios
impl RewardCenterError {
    /// Create a derivation error named after the first seed
    pub fn derivation_exhausted(seed: &[u8]) -> Self {
        Self::DerivationExhausted {
            seed: String::from_utf8_lossy(seed).into_owned(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an RPC error
    pub fn rpc(reason: impl Into<String>) -> Self {
        Self::Rpc(reason.into())
    }

    /// Create a rejection error from a host message
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::SubmissionRejected(reason.into())
    }
}

/// Result alias used throughout the crate
pub type RewardCenterResult<T> = std::result::Result<T, RewardCenterError>;
