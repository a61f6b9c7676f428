//! Transaction composition and submission
//!
//! Composition fetches the latest blockhash and the lookup table right before
//! compiling the v0 message so the block reference is as fresh as possible
//! relative to broadcast. Submission is send-then-confirm with no retry;
//! a timed-out operation must be rebuilt from scratch.

use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signer::Signer,
    transaction::VersionedTransaction,
};
use tracing::{debug, info};

use crate::compat;
use crate::host::{BlockhashInfo, ChainRpc, DynSigner, TransactionConfirmer};
use crate::tx_builder::context::CancellationHandle;
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};
use crate::tx_builder::instructions::{sanity_check_ix_order, TransactionBuilder};
use crate::tx_builder::output::OperationOutput;

/// A signed transaction plus the blockhash bound it was built against
#[derive(Debug, Clone)]
pub struct ComposedTransaction {
    pub transaction: VersionedTransaction,
    pub blockhash: BlockhashInfo,
}

/// Compile and sign a v0 transaction from already-fetched inputs
///
/// `signers` must cover exactly the message's required signers; extra
/// signers not referenced by any instruction are dropped. The signed
/// transaction must fit in one packet.
pub fn compile_transaction(
    payer: &Pubkey,
    instructions: &[Instruction],
    lookup_tables: &[AddressLookupTableAccount],
    blockhash: Hash,
    signers: &[DynSigner],
) -> RewardCenterResult<VersionedTransaction> {
    let message = v0::Message::try_compile(payer, instructions, lookup_tables, blockhash)
        .map_err(|e| RewardCenterError::MessageCompile(e.to_string()))?;
    let message = VersionedMessage::V0(message);

    let available: Vec<Pubkey> = signers.iter().map(|s| s.pubkey()).collect();
    let missing = compat::missing_signers(&message, &available);
    if !missing.is_empty() {
        return Err(RewardCenterError::Signing(format!(
            "no signer available for required keys: {:?}",
            missing
        )));
    }

    let required = compat::get_required_signers(&message);
    let signing: Vec<&dyn Signer> = signers
        .iter()
        .filter(|s| required.contains(&s.pubkey()))
        .map(|s| s.as_ref() as &dyn Signer)
        .collect();

    debug!(
        required_signatures = compat::get_num_required_signatures(&message),
        static_accounts = compat::get_static_account_keys(&message).len(),
        lookup_accounts = compat::get_num_lookup_table_accounts(&message),
        "Compiled v0 message"
    );

    let transaction = VersionedTransaction::try_new(message, &signing[..])
        .map_err(|e| RewardCenterError::Signing(e.to_string()))?;

    let size = bincode::serialized_size(&transaction)
        .map_err(|e| RewardCenterError::MessageCompile(e.to_string()))?;
    if size as usize > PACKET_DATA_SIZE {
        return Err(RewardCenterError::MessageCompile(format!(
            "transaction is {} bytes, limit is {}",
            size, PACKET_DATA_SIZE
        )));
    }
    Ok(transaction)
}

/// Fetch chain inputs and compose a signed transaction for `builder`
pub async fn compose<C>(
    rpc: &dyn ChainRpc,
    builder: &TransactionBuilder<C>,
    address_lookup_table: &Pubkey,
    commitment: CommitmentConfig,
) -> RewardCenterResult<ComposedTransaction> {
    let payer = builder
        .fee_payer()
        .ok_or(RewardCenterError::MissingFeePayer)?
        .pubkey();
    sanity_check_ix_order(builder.records())?;

    let blockhash = rpc.latest_blockhash(commitment).await?;
    let lookup_table = rpc
        .address_lookup_table(address_lookup_table)
        .await?
        .ok_or_else(|| RewardCenterError::LookupTableNotFound(address_lookup_table.to_string()))?;

    let transaction = compile_transaction(
        &payer,
        &builder.instructions(),
        &[lookup_table],
        blockhash.blockhash,
        &builder.signers(),
    )?;

    Ok(ComposedTransaction {
        transaction,
        blockhash,
    })
}

/// Compose, broadcast and confirm, returning the merged output
///
/// Cancellation is checked before broadcast (nothing sent) and again after
/// confirmation (the transaction has landed).
pub async fn submit<C>(
    rpc: &dyn ChainRpc,
    confirmer: &dyn TransactionConfirmer,
    builder: TransactionBuilder<C>,
    address_lookup_table: &Pubkey,
    commitment: CommitmentConfig,
    cancellation: &CancellationHandle,
) -> RewardCenterResult<OperationOutput<C>> {
    let composed = compose(rpc, &builder, address_lookup_table, commitment).await?;
    cancellation.throw_if_canceled(false)?;

    let signature = rpc.send_transaction(&composed.transaction).await?;
    info!(
        signature = %signature,
        instructions = ?builder.keys(),
        last_valid_block_height = composed.blockhash.last_valid_block_height,
        "Transaction broadcast"
    );

    let response = confirmer
        .confirm_transaction(&signature, &composed.blockhash, commitment)
        .await?;
    info!(
        signature = %signature,
        slot = response.slot,
        status = ?response.confirmation_status,
        "Transaction confirmed"
    );

    cancellation.throw_if_canceled(true)?;
    Ok(OperationOutput::new(response, builder.into_context()))
}
