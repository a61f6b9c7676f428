//! Instruction encodings for the reward center program
//!
//! Each instruction is an 8-byte discriminator (`sha256("global:<name>")[..8]`)
//! followed by the borsh-encoded parameter struct. Account lists are emitted
//! in the exact order the program declares them.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::host::ProgramRegistry;
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct CreateListingParams {
    pub trade_state_bump: u8,
    pub free_trade_state_bump: u8,
    pub program_as_signer_bump: u8,
    pub price: u64,
    pub token_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct UpdateListingParams {
    pub new_price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct CreateOfferParams {
    pub trade_state_bump: u8,
    pub escrow_payment_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct CloseOfferParams {
    pub escrow_payment_bump: u8,
}

/// Bumps shared by the two settlement instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize)]
pub struct SettlementParams {
    pub escrow_payment_bump: u8,
    pub free_trade_state_bump: u8,
    pub seller_trade_state_bump: u8,
    pub program_as_signer_bump: u8,
    pub buyer_trade_state_bump: u8,
}

pub type AcceptOfferParams = SettlementParams;
pub type BuyListingParams = SettlementParams;

// ============================================================================
// Encoding helpers
// ============================================================================

/// Anchor-style discriminator for a global instruction
pub fn discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn encode<T: BorshSerialize>(name: &str, params: Option<&T>) -> RewardCenterResult<Vec<u8>> {
    let mut data = discriminator(name).to_vec();
    if let Some(params) = params {
        params.serialize(&mut data).map_err(|e| {
            RewardCenterError::MessageCompile(format!("failed to encode {} params: {}", name, e))
        })?;
    }
    Ok(data)
}

fn signer_mut(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, true)
}

fn writable(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

fn readonly(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

// ============================================================================
// Listings
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CreateListingAccounts {
    pub wallet: Pubkey,
    pub listing: Pubkey,
    pub reward_center: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    pub authority: Pubkey,
    pub auction_house: Pubkey,
    pub auction_house_fee_account: Pubkey,
    pub seller_trade_state: Pubkey,
    pub free_seller_trade_state: Pubkey,
    pub ah_auctioneer_pda: Pubkey,
    pub program_as_signer: Pubkey,
}

/// Build `create_listing`
///
/// Accounts:
/// 0. wallet (signer, mut)
/// 1. listing (mut)
/// 2. reward_center
/// 3. token_account (mut)
/// 4. metadata
/// 5. authority
/// 6. auction_house
/// 7. auction_house_fee_account (mut)
/// 8. seller_trade_state (mut)
/// 9. free_seller_trade_state (mut)
/// 10. ah_auctioneer_pda
/// 11. program_as_signer
/// 12. auction_house_program
/// 13. token_program
/// 14. system_program
/// 15. rent
pub fn create_listing(
    programs: &ProgramRegistry,
    accounts: &CreateListingAccounts,
    params: CreateListingParams,
) -> RewardCenterResult<Instruction> {
    let keys = vec![
        signer_mut(accounts.wallet),
        writable(accounts.listing),
        readonly(accounts.reward_center),
        writable(accounts.token_account),
        readonly(accounts.metadata),
        readonly(accounts.authority),
        readonly(accounts.auction_house),
        writable(accounts.auction_house_fee_account),
        writable(accounts.seller_trade_state),
        writable(accounts.free_seller_trade_state),
        readonly(accounts.ah_auctioneer_pda),
        readonly(accounts.program_as_signer),
        readonly(programs.auction_house),
        readonly(spl_token::ID),
        readonly(system_program::ID),
        readonly(sysvar::rent::ID),
    ];
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("create_listing", Some(&params))?,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateListingAccounts {
    pub wallet: Pubkey,
    pub listing: Pubkey,
    pub reward_center: Pubkey,
    pub metadata: Pubkey,
    pub token_account: Pubkey,
    pub auction_house: Pubkey,
}

/// Build `update_listing`
///
/// Accounts: wallet (signer, mut), listing (mut), reward_center, metadata,
/// token_account (mut), auction_house, auction_house_program.
pub fn update_listing(
    programs: &ProgramRegistry,
    accounts: &UpdateListingAccounts,
    params: UpdateListingParams,
) -> RewardCenterResult<Instruction> {
    let keys = vec![
        signer_mut(accounts.wallet),
        writable(accounts.listing),
        readonly(accounts.reward_center),
        readonly(accounts.metadata),
        writable(accounts.token_account),
        readonly(accounts.auction_house),
        readonly(programs.auction_house),
    ];
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("update_listing", Some(&params))?,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct CloseListingAccounts {
    pub wallet: Pubkey,
    pub listing: Pubkey,
    pub reward_center: Pubkey,
    pub metadata: Pubkey,
    pub token_account: Pubkey,
    pub token_mint: Pubkey,
    pub authority: Pubkey,
    pub auction_house: Pubkey,
    pub auction_house_fee_account: Pubkey,
    pub trade_state: Pubkey,
    pub ah_auctioneer_pda: Pubkey,
}

/// Build `close_listing` (no parameters)
///
/// Accounts:
/// 0. wallet (signer, mut)
/// 1. listing (mut)
/// 2. reward_center
/// 3. metadata
/// 4. token_account (mut)
/// 5. token_mint
/// 6. authority
/// 7. auction_house
/// 8. auction_house_fee_account (mut)
/// 9. trade_state (mut)
/// 10. ah_auctioneer_pda
/// 11. auction_house_program
/// 12. token_program
pub fn close_listing(
    programs: &ProgramRegistry,
    accounts: &CloseListingAccounts,
) -> RewardCenterResult<Instruction> {
    let keys = vec![
        signer_mut(accounts.wallet),
        writable(accounts.listing),
        readonly(accounts.reward_center),
        readonly(accounts.metadata),
        writable(accounts.token_account),
        readonly(accounts.token_mint),
        readonly(accounts.authority),
        readonly(accounts.auction_house),
        writable(accounts.auction_house_fee_account),
        writable(accounts.trade_state),
        readonly(accounts.ah_auctioneer_pda),
        readonly(programs.auction_house),
        readonly(spl_token::ID),
    ];
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode::<()>("close_listing", None)?,
    })
}

// ============================================================================
// Offers
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CreateOfferAccounts {
    pub wallet: Pubkey,
    pub offer: Pubkey,
    pub payment_account: Pubkey,
    pub transfer_authority: Pubkey,
    pub treasury_mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    pub escrow_payment_account: Pubkey,
    pub authority: Pubkey,
    pub reward_center: Pubkey,
    pub auction_house: Pubkey,
    pub auction_house_fee_account: Pubkey,
    pub buyer_trade_state: Pubkey,
    pub ah_auctioneer_pda: Pubkey,
}

/// Build `create_offer`
///
/// Accounts:
/// 0. wallet (signer, mut)
/// 1. offer (mut)
/// 2. payment_account (mut)
/// 3. transfer_authority
/// 4. treasury_mint
/// 5. token_account
/// 6. metadata
/// 7. escrow_payment_account (mut)
/// 8. authority
/// 9. reward_center
/// 10. auction_house
/// 11. auction_house_fee_account (mut)
/// 12. buyer_trade_state (mut)
/// 13. ah_auctioneer_pda
/// 14. auction_house_program
/// 15. token_program
/// 16. system_program
/// 17. rent
pub fn create_offer(
    programs: &ProgramRegistry,
    accounts: &CreateOfferAccounts,
    params: CreateOfferParams,
) -> RewardCenterResult<Instruction> {
    let keys = vec![
        signer_mut(accounts.wallet),
        writable(accounts.offer),
        writable(accounts.payment_account),
        readonly(accounts.transfer_authority),
        readonly(accounts.treasury_mint),
        readonly(accounts.token_account),
        readonly(accounts.metadata),
        writable(accounts.escrow_payment_account),
        readonly(accounts.authority),
        readonly(accounts.reward_center),
        readonly(accounts.auction_house),
        writable(accounts.auction_house_fee_account),
        writable(accounts.buyer_trade_state),
        readonly(accounts.ah_auctioneer_pda),
        readonly(programs.auction_house),
        readonly(spl_token::ID),
        readonly(system_program::ID),
        readonly(sysvar::rent::ID),
    ];
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("create_offer", Some(&params))?,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct CloseOfferAccounts {
    pub wallet: Pubkey,
    pub offer: Pubkey,
    pub treasury_mint: Pubkey,
    pub token_account: Pubkey,
    pub receipt_account: Pubkey,
    pub escrow_payment_account: Pubkey,
    pub metadata: Pubkey,
    pub token_mint: Pubkey,
    pub authority: Pubkey,
    pub reward_center: Pubkey,
    pub auction_house: Pubkey,
    pub auction_house_fee_account: Pubkey,
    pub trade_state: Pubkey,
    pub ah_auctioneer_pda: Pubkey,
}

/// Build `close_offer`
///
/// Accounts:
/// 0. wallet (signer, mut)
/// 1. offer (mut)
/// 2. treasury_mint
/// 3. token_account (mut)
/// 4. receipt_account (mut)
/// 5. escrow_payment_account (mut)
/// 6. metadata
/// 7. token_mint
/// 8. authority
/// 9. reward_center
/// 10. auction_house
/// 11. auction_house_fee_account (mut)
/// 12. trade_state (mut)
/// 13. ah_auctioneer_pda
/// 14. auction_house_program
/// 15. token_program
/// 16. system_program
/// 17. associated_token_program
/// 18. rent
pub fn close_offer(
    programs: &ProgramRegistry,
    accounts: &CloseOfferAccounts,
    params: CloseOfferParams,
) -> RewardCenterResult<Instruction> {
    let keys = vec![
        signer_mut(accounts.wallet),
        writable(accounts.offer),
        readonly(accounts.treasury_mint),
        writable(accounts.token_account),
        writable(accounts.receipt_account),
        writable(accounts.escrow_payment_account),
        readonly(accounts.metadata),
        readonly(accounts.token_mint),
        readonly(accounts.authority),
        readonly(accounts.reward_center),
        readonly(accounts.auction_house),
        writable(accounts.auction_house_fee_account),
        writable(accounts.trade_state),
        readonly(accounts.ah_auctioneer_pda),
        readonly(programs.auction_house),
        readonly(spl_token::ID),
        readonly(system_program::ID),
        readonly(spl_associated_token_account::ID),
        readonly(sysvar::rent::ID),
    ];
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("close_offer", Some(&params))?,
    })
}

// ============================================================================
// Settlement
// ============================================================================

/// Accounts shared by `accept_offer` and `buy_listing`
#[derive(Debug, Clone, Copy)]
pub struct SettlementAccounts {
    pub buyer: Pubkey,
    pub buyer_reward_token_account: Pubkey,
    pub seller: Pubkey,
    pub seller_reward_token_account: Pubkey,
    pub token_account: Pubkey,
    pub token_mint: Pubkey,
    pub metadata: Pubkey,
    pub treasury_mint: Pubkey,
    pub seller_payment_receipt_account: Pubkey,
    pub buyer_receipt_token_account: Pubkey,
    pub authority: Pubkey,
    pub escrow_payment_account: Pubkey,
    pub auction_house: Pubkey,
    pub auction_house_fee_account: Pubkey,
    pub auction_house_treasury: Pubkey,
    pub buyer_trade_state: Pubkey,
    pub seller_trade_state: Pubkey,
    pub free_seller_trade_state: Pubkey,
    pub reward_center: Pubkey,
    pub reward_center_reward_token_account: Pubkey,
    pub ah_auctioneer_pda: Pubkey,
    pub program_as_signer: Pubkey,
}

impl SettlementAccounts {
    /// Everything from `token_account` onwards, identical for both instructions
    fn tail(&self, programs: &ProgramRegistry) -> Vec<AccountMeta> {
        vec![
            writable(self.token_account),
            readonly(self.token_mint),
            readonly(self.metadata),
            readonly(self.treasury_mint),
            writable(self.seller_payment_receipt_account),
            writable(self.buyer_receipt_token_account),
            readonly(self.authority),
            writable(self.escrow_payment_account),
            readonly(self.auction_house),
            writable(self.auction_house_fee_account),
            writable(self.auction_house_treasury),
            writable(self.buyer_trade_state),
            writable(self.seller_trade_state),
            writable(self.free_seller_trade_state),
            writable(self.reward_center),
            writable(self.reward_center_reward_token_account),
            readonly(self.ah_auctioneer_pda),
            readonly(self.program_as_signer),
            readonly(programs.auction_house),
            readonly(spl_token::ID),
            readonly(system_program::ID),
            readonly(spl_associated_token_account::ID),
            readonly(sysvar::rent::ID),
        ]
    }
}

/// Build `accept_offer`, appending `creators` after the program's own accounts
///
/// Leading accounts: buyer (mut), buyer_reward_token_account (mut),
/// seller (signer, mut), seller_reward_token_account (mut), offer (mut),
/// then the shared settlement tail.
pub fn accept_offer(
    programs: &ProgramRegistry,
    offer: Pubkey,
    accounts: &SettlementAccounts,
    params: AcceptOfferParams,
    creators: &[AccountMeta],
) -> RewardCenterResult<Instruction> {
    let mut keys = vec![
        writable(accounts.buyer),
        writable(accounts.buyer_reward_token_account),
        signer_mut(accounts.seller),
        writable(accounts.seller_reward_token_account),
        writable(offer),
    ];
    keys.extend(accounts.tail(programs));
    keys.extend_from_slice(creators);
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("accept_offer", Some(&params))?,
    })
}

/// Build `buy_listing`, appending `creators` after the program's own accounts
///
/// Leading accounts: buyer (signer, mut), payment_account (mut),
/// transfer_authority, buyer_reward_token_account (mut), seller (mut),
/// seller_reward_token_account (mut), listing (mut), then the shared
/// settlement tail.
pub fn buy_listing(
    programs: &ProgramRegistry,
    listing: Pubkey,
    accounts: &SettlementAccounts,
    params: BuyListingParams,
    creators: &[AccountMeta],
) -> RewardCenterResult<Instruction> {
    let mut keys = vec![
        signer_mut(accounts.buyer),
        writable(accounts.buyer),
        readonly(accounts.buyer),
        writable(accounts.buyer_reward_token_account),
        writable(accounts.seller),
        writable(accounts.seller_reward_token_account),
        writable(listing),
    ];
    keys.extend(accounts.tail(programs));
    keys.extend_from_slice(creators);
    Ok(Instruction {
        program_id: programs.reward_center,
        accounts: keys,
        data: encode("buy_listing", Some(&params))?,
    })
}
