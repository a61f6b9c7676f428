//! V0 Transaction Compatibility Tests
//!
//! Composed transactions must be v0 messages that resolve non-signer accounts
//! through the lookup table, keep signers and invoked programs static, and
//! survive the wire encoding unchanged.

use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::VersionedMessage,
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signer::Signer,
    transaction::VersionedTransaction,
};
use std::sync::Arc;

use super::test_helpers::*;
use crate::compat::{
    get_message_header, get_num_lookup_table_accounts, get_num_required_signatures,
    get_required_signers, get_static_account_keys,
};
use crate::operations::accept_offer::{self, AcceptOfferProbes};
use crate::pdas::RewardCenterPdas;
use crate::tx_builder::{compile_transaction, compose, OperationOptions, RewardCenterError};

fn program_ix(signer: &Pubkey, readonly: &[Pubkey]) -> Instruction {
    let mut accounts = vec![AccountMeta::new(*signer, true)];
    accounts.extend(readonly.iter().map(|k| AccountMeta::new_readonly(*k, false)));
    Instruction::new_with_bytes(Pubkey::new_unique(), &[1, 2, 3], accounts)
}

#[test]
fn test_lookup_table_accounts_leave_static_keys() {
    let payer = new_signer();
    let table_keys: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
    let table = AddressLookupTableAccount {
        key: Pubkey::new_unique(),
        addresses: table_keys.clone(),
    };

    let tx = compile_transaction(
        &payer.pubkey(),
        &[program_ix(&payer.pubkey(), &table_keys)],
        &[table],
        Hash::new_unique(),
        &[payer.clone()],
    )
    .unwrap();

    let static_keys = get_static_account_keys(&tx.message);
    assert!(table_keys.iter().all(|k| !static_keys.contains(k)));
    assert_eq!(get_num_lookup_table_accounts(&tx.message), 3);
    assert_eq!(get_required_signers(&tx.message).to_vec(), vec![payer.pubkey()]);
}

#[test]
fn test_signer_in_lookup_table_stays_static() {
    let payer = new_signer();
    let table = AddressLookupTableAccount {
        key: Pubkey::new_unique(),
        addresses: vec![payer.pubkey()],
    };

    let tx = compile_transaction(
        &payer.pubkey(),
        &[program_ix(&payer.pubkey(), &[])],
        &[table],
        Hash::new_unique(),
        &[payer.clone()],
    )
    .unwrap();

    assert_eq!(get_num_lookup_table_accounts(&tx.message), 0);
    assert_eq!(get_static_account_keys(&tx.message)[0], payer.pubkey());
}

#[test]
fn test_header_counts_payer_and_cosigner() {
    let payer = new_signer();
    let seller = new_signer();

    let tx = compile_transaction(
        &payer.pubkey(),
        &[program_ix(&seller.pubkey(), &[])],
        &[],
        Hash::new_unique(),
        &[seller.clone(), payer.clone()],
    )
    .unwrap();

    let header = get_message_header(&tx.message);
    assert_eq!(header.num_required_signatures, 2);
    assert_eq!(get_num_required_signatures(&tx.message), 2);
    assert_eq!(get_required_signers(&tx.message).to_vec(), vec![payer.pubkey(), seller.pubkey()]);
    assert!(tx.verify_with_results().iter().all(|ok| *ok));
}

#[test]
fn test_settlement_fits_in_one_packet_with_lookup_table() {
    let pdas = RewardCenterPdas::default();
    let seller = new_signer();
    let market = MarketFixture::new();
    let input = market.accept_offer("3", Pubkey::new_unique(), MarketFixture::creators(5));
    let probes = AcceptOfferProbes {
        listing_exists: true,
        seller_reward_account_exists: false,
    };
    let builder = accept_offer::build(&pdas, &input, &seller, Some(seller.clone()), 400_000, probes)
        .unwrap();
    let table = lookup_table_for(market.address_lookup_table, &builder);

    let tx = compile_transaction(
        &seller.pubkey(),
        &builder.instructions(),
        &[table],
        Hash::new_unique(),
        &builder.signers(),
    )
    .unwrap();

    let bytes = bincode::serialize(&tx).unwrap();
    assert!(bytes.len() <= PACKET_DATA_SIZE);

    let decoded: VersionedTransaction = bincode::deserialize(&bytes).unwrap();
    assert!(matches!(decoded.message, VersionedMessage::V0(_)));
    assert_eq!(decoded.signatures, tx.signatures);
    assert_eq!(decoded.message.instructions().len(), 4);
}

#[tokio::test]
async fn test_compose_uses_fresh_blockhash_and_table() {
    let host = Arc::new(MockHost::new());
    let buyer = new_signer();
    let client = client_for(&host, &buyer);
    let market = MarketFixture::new();
    let input = market.make_offer("1");

    let builder = client.prepare(&input, &OperationOptions::default()).await.unwrap();
    let err = compose(host.as_ref(), &builder, &market.address_lookup_table, Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RewardCenterError::LookupTableNotFound(_)));

    host.add_lookup_table(lookup_table_for(market.address_lookup_table, &builder));
    let composed = compose(
        host.as_ref(),
        &builder,
        &market.address_lookup_table,
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(*composed.transaction.message.recent_blockhash(), host.blockhash());
    assert_eq!(composed.blockhash.last_valid_block_height, LAST_VALID_BLOCK_HEIGHT);
    assert!(get_num_lookup_table_accounts(&composed.transaction.message) > 0);
    assert_eq!(host.blockhash_requests(), 2);
}
