//! Instruction records and the per-operation transaction builder
//!
//! An operation assembles an ordered list of [`InstructionRecord`]s, each a
//! low-level instruction plus the signers it needs and a string key used for
//! ordering checks and logs. The builder also carries the fee payer and the
//! operation-specific context that ends up in the final output.
//!
//! Ordering rules enforced by [`sanity_check_ix_order`]:
//! 1. Compute budget instructions (if any) come first
//! 2. Setup instructions (account creation, closing stale state)
//! 3. The core marketplace instruction comes last

use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::Instruction,
    pubkey::Pubkey,
};

use crate::host::DynSigner;
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

/// One low-level instruction with its required signers and label
#[derive(Clone)]
pub struct InstructionRecord {
    pub instruction: Instruction,
    pub signers: Vec<DynSigner>,
    pub key: &'static str,
}

impl InstructionRecord {
    pub fn new(instruction: Instruction, signers: Vec<DynSigner>, key: &'static str) -> Self {
        Self {
            instruction,
            signers,
            key,
        }
    }
}

impl std::fmt::Debug for InstructionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionRecord")
            .field("key", &self.key)
            .field("program_id", &self.instruction.program_id)
            .field("accounts", &self.instruction.accounts.len())
            .field("signers", &self.signers.iter().map(|s| s.pubkey()).collect::<Vec<_>>())
            .finish()
    }
}

/// Ordered instruction list, fee payer and accumulated context for one operation
pub struct TransactionBuilder<C> {
    records: Vec<InstructionRecord>,
    fee_payer: Option<DynSigner>,
    context: C,
}

impl<C> TransactionBuilder<C> {
    pub fn new(context: C) -> Self {
        Self {
            records: Vec::with_capacity(4),
            fee_payer: None,
            context,
        }
    }

    pub fn set_fee_payer(mut self, fee_payer: Option<DynSigner>) -> Self {
        self.fee_payer = fee_payer;
        self
    }

    pub fn add(&mut self, record: InstructionRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn records(&self) -> &[InstructionRecord] {
        &self.records
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.key).collect()
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        self.records.iter().map(|r| r.instruction.clone()).collect()
    }

    pub fn fee_payer(&self) -> Option<&DynSigner> {
        self.fee_payer.as_ref()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Fee payer first, then every record signer, deduplicated by pubkey
    pub fn signers(&self) -> Vec<DynSigner> {
        let mut seen: Vec<Pubkey> = Vec::new();
        let mut signers = Vec::new();
        let all = self
            .fee_payer
            .iter()
            .chain(self.records.iter().flat_map(|r| r.signers.iter()));
        for signer in all {
            let key = signer.pubkey();
            if !seen.contains(&key) {
                seen.push(key);
                signers.push(signer.clone());
            }
        }
        signers
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for TransactionBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("records", &self.records)
            .field("fee_payer", &self.fee_payer.as_ref().map(|s| s.pubkey()))
            .field("context", &self.context)
            .finish()
    }
}

/// Record that raises the compute unit limit for the transaction
pub fn compute_unit_limit_record(
    units: u32,
    signer: DynSigner,
    key: &'static str,
) -> InstructionRecord {
    InstructionRecord::new(
        ComputeBudgetInstruction::set_compute_unit_limit(units),
        vec![signer],
        key,
    )
}

/// Validate the ordering of an assembled instruction list
///
/// Compute budget instructions must form a prefix and the list must be
/// non-empty with a non-compute-budget instruction last.
pub fn sanity_check_ix_order(records: &[InstructionRecord]) -> RewardCenterResult<()> {
    let Some(last) = records.last() else {
        return Err(RewardCenterError::Configuration(
            "Instruction list is empty".to_string(),
        ));
    };

    let is_budget = |r: &InstructionRecord| r.instruction.program_id == compute_budget::id();

    if is_budget(last) {
        return Err(RewardCenterError::Configuration(format!(
            "Final instruction '{}' must not be a compute budget instruction",
            last.key
        )));
    }

    let prefix = records.iter().take_while(|r| is_budget(r)).count();
    if let Some((idx, record)) = records
        .iter()
        .enumerate()
        .skip(prefix)
        .find(|(_, r)| is_budget(r))
    {
        return Err(RewardCenterError::Configuration(format!(
            "Compute budget instruction '{}' at position {} follows program instructions",
            record.key, idx
        )));
    }

    Ok(())
}
