//! Transaction composition for reward center operations
//!
//! ## Architecture
//!
//! - **errors**: error taxonomy shared by the whole crate
//! - **instructions**: instruction records, the per-operation builder and ordering checks
//! - **context**: per-call options and cooperative cancellation
//! - **builder**: v0 message compilation, signing, broadcast and confirmation
//! - **output**: the operation result returned to callers
//!
//! ## Flow
//!
//! An operation fills a [`TransactionBuilder`] with ordered
//! [`InstructionRecord`]s and a context value. [`submit`] then fetches the
//! latest blockhash and the lookup table, compiles a v0 message, signs it with
//! every signer the records reference, broadcasts, waits for confirmation and
//! returns an [`OperationOutput`] carrying the context and the confirmation.

pub mod builder;
pub mod context;
pub mod errors;
pub mod instructions;
pub mod output;

pub use builder::{compile_transaction, compose, submit, ComposedTransaction};
pub use context::{CancellationHandle, OperationOptions};
pub use errors::{RewardCenterError, RewardCenterResult};
pub use instructions::{
    compute_unit_limit_record, sanity_check_ix_order, InstructionRecord, TransactionBuilder,
};
pub use output::OperationOutput;
