//! Program ids, seed literals and fixed protocol values

use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey, pubkey::Pubkey};

/// Reward center marketplace program
pub const REWARD_CENTER_PROGRAM_ID: Pubkey = pubkey!("RwDDvPp7ta9qqUwxbBfShsNreBaSsKvFcHzMxfBC3Ki");

/// Auction house program that owns escrow and trade state accounts
pub const AUCTION_HOUSE_PROGRAM_ID: Pubkey = pubkey!("hausS13jsjafwWwGqZTUQRmWyvyxn9EQpqMwV1PBBmk");

// Reward center seeds
pub const REWARD_CENTER_SEED: &[u8] = b"reward_center";
pub const LISTING_SEED: &[u8] = b"listing";
pub const OFFER_SEED: &[u8] = b"offer";
pub const PURCHASE_TICKET_SEED: &[u8] = b"purchase_ticket";

// Auction house seeds
pub const AUCTION_HOUSE_SEED: &[u8] = b"auction_house";
pub const AUCTIONEER_SEED: &[u8] = b"auctioneer";
pub const SIGNER_SEED: &[u8] = b"signer";

/// Price seed used by auctioneer trade states
pub const AUCTIONEER_TRADE_STATE_PRICE: u64 = u64::MAX;

/// Every listing and offer trades exactly one token
pub const TOKEN_SIZE: u64 = 1;

/// Base units per whole unit of the chain's primary currency
pub const BASE_UNITS_PER_TOKEN: u64 = LAMPORTS_PER_SOL;

/// Decimal places carried by [`BASE_UNITS_PER_TOKEN`]
pub const BASE_UNIT_DECIMALS: u32 = 9;

/// Compute unit limit for accept-offer and buy, which touch many accounts
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 400_000;

/// Network ceiling for a single transaction's compute unit limit
pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;
