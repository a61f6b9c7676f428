//! Uniform access to versioned message internals
//!
//! Operations always compile v0 messages, but the helpers accept any
//! `VersionedMessage` so tests and tooling can inspect legacy ones too.

use solana_sdk::{
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
};

#[inline]
#[must_use]
pub fn get_message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.header,
        VersionedMessage::V0(v0_msg) => &v0_msg.header,
    }
}

/// Keys embedded directly in the message, excluding lookup-table loads
#[inline]
#[must_use]
pub fn get_static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.account_keys,
        VersionedMessage::V0(v0_msg) => &v0_msg.account_keys,
    }
}

/// The first `num_required_signatures` static keys
#[inline]
#[must_use]
pub fn get_required_signers(message: &VersionedMessage) -> &[Pubkey] {
    let num_signers = get_message_header(message).num_required_signatures as usize;
    let account_keys = get_static_account_keys(message);
    &account_keys[..num_signers.min(account_keys.len())]
}

#[inline]
#[must_use]
pub fn get_num_required_signatures(message: &VersionedMessage) -> u8 {
    get_message_header(message).num_required_signatures
}

/// Number of accounts resolved through address lookup tables
#[must_use]
pub fn get_num_lookup_table_accounts(message: &VersionedMessage) -> usize {
    match message {
        VersionedMessage::Legacy(_) => 0,
        VersionedMessage::V0(v0_msg) => v0_msg
            .address_table_lookups
            .iter()
            .map(|l| l.writable_indexes.len() + l.readonly_indexes.len())
            .sum(),
    }
}

/// Required signers of `message` that are absent from `available`
#[must_use]
pub fn missing_signers(message: &VersionedMessage, available: &[Pubkey]) -> Vec<Pubkey> {
    get_required_signers(message)
        .iter()
        .filter(|key| !available.contains(key))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        address_lookup_table::AddressLookupTableAccount,
        hash::Hash,
        instruction::{AccountMeta, Instruction},
        message::{v0::Message as MessageV0, Message},
        signature::Keypair,
        signer::Signer,
    };

    fn two_signer_ix(first: &Pubkey, second: &Pubkey, extra: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[0],
            vec![
                AccountMeta::new(*first, true),
                AccountMeta::new(*second, true),
                AccountMeta::new_readonly(*extra, false),
            ],
        )
    }

    #[test]
    fn test_legacy_and_v0_agree_on_header() {
        let payer = Keypair::new();
        let seller = Keypair::new();
        let ix = two_signer_ix(&payer.pubkey(), &seller.pubkey(), &Pubkey::new_unique());

        let legacy = VersionedMessage::Legacy(Message::new(&[ix.clone()], Some(&payer.pubkey())));
        let v0 = VersionedMessage::V0(
            MessageV0::try_compile(&payer.pubkey(), &[ix], &[], Hash::default()).unwrap(),
        );

        for message in [&legacy, &v0] {
            assert_eq!(get_num_required_signatures(message), 2);
            assert_eq!(get_required_signers(message)[0], payer.pubkey());
            assert_eq!(get_static_account_keys(message)[0], payer.pubkey());
        }
    }

    #[test]
    fn test_lookup_table_accounts_are_counted() {
        let payer = Keypair::new();
        let seller = Keypair::new();
        let in_table = Pubkey::new_unique();
        let ix = two_signer_ix(&payer.pubkey(), &seller.pubkey(), &in_table);
        let table = AddressLookupTableAccount {
            key: Pubkey::new_unique(),
            addresses: vec![in_table],
        };

        let message = VersionedMessage::V0(
            MessageV0::try_compile(&payer.pubkey(), &[ix], &[table], Hash::default()).unwrap(),
        );
        assert_eq!(get_num_lookup_table_accounts(&message), 1);
        assert!(!get_static_account_keys(&message).contains(&in_table));
    }

    #[test]
    fn test_missing_signers() {
        let payer = Keypair::new();
        let seller = Keypair::new();
        let ix = two_signer_ix(&payer.pubkey(), &seller.pubkey(), &Pubkey::new_unique());
        let message = VersionedMessage::V0(
            MessageV0::try_compile(&payer.pubkey(), &[ix], &[], Hash::default()).unwrap(),
        );

        assert_eq!(missing_signers(&message, &[payer.pubkey()]), vec![seller.pubkey()]);
        assert!(missing_signers(&message, &[payer.pubkey(), seller.pubkey()]).is_empty());
    }
}
