//! Structured logging and per-operation context

use std::time::Instant;
use tracing::Span;
use uuid::Uuid;

use crate::tx_builder::RewardCenterError;

/// Structured logger bound to one operation call
#[derive(Debug, Clone)]
pub struct OperationLogger {
    correlation_id: String,
    operation: &'static str,
    started: Instant,
}

impl OperationLogger {
    pub fn new(operation: &'static str) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            operation,
            started: Instant::now(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Span every event of this operation is recorded under
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "operation",
            name = self.operation,
            correlation_id = %self.correlation_id
        )
    }

    pub fn log_start(&self, signer: &str, fee_payer: Option<&str>) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            signer = %signer,
            fee_payer = ?fee_payer,
            "Operation started"
        );
    }

    pub fn log_instructions(&self, keys: &[&'static str]) {
        tracing::debug!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            instructions = ?keys,
            "Instruction list assembled"
        );
    }

    pub fn log_success(&self, signature: &str, slot: u64) {
        tracing::info!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            signature = %signature,
            slot,
            latency_ms = self.elapsed_ms(),
            "Operation confirmed"
        );
    }

    pub fn log_failure(&self, error: &RewardCenterError) {
        tracing::warn!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            category = error.category(),
            retryable = error.is_retryable(),
            error = %error,
            latency_ms = self.elapsed_ms(),
            "Operation failed"
        );
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_ids_are_unique() {
        let first = OperationLogger::new("buy");
        let second = OperationLogger::new("buy");
        assert_ne!(first.correlation_id(), second.correlation_id());
        assert!(Uuid::parse_str(first.correlation_id()).is_ok());
        assert_eq!(first.operation(), "buy");
    }

    #[test]
    fn test_logging_without_subscriber_is_noop() {
        let logger = OperationLogger::new("make_offer");
        let _guard = logger.span().entered();
        logger.log_start("signer", None);
        logger.log_instructions(&["buyerATA", "makeOffer"]);
        logger.log_failure(&RewardCenterError::MissingFeePayer);
        logger.log_success("sig", 10);
    }
}
