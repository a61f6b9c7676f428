//! Program-derived addresses for the reward center and auction house programs
//!
//! Every derivation is a pure function of its seeds and program id. Seed
//! order and byte encoding must match the on-chain programs exactly; the
//! tables below are the canonical layouts.
//!
//! | Derivation | Program | Seeds |
//! |---|---|---|
//! | reward center | reward center | `"reward_center"`, auction house |
//! | listing | reward center | `"listing"`, seller, metadata, reward center |
//! | offer | reward center | `"offer"`, buyer, metadata, reward center |
//! | purchase ticket | reward center | `"purchase_ticket"`, listing, offer |
//! | auctioneer | auction house | `"auctioneer"`, auction house, reward center |
//! | auctioneer trade state | auction house | `"auction_house"`, wallet, auction house, token account, treasury mint, token mint, `u64::MAX` LE, token size LE |
//! | trade state | auction house | `"auction_house"`, wallet, auction house, token account, treasury mint, token mint, price LE, token size LE |
//! | buyer escrow | auction house | `"auction_house"`, auction house, wallet |
//! | program as signer | auction house | `"auction_house"`, `"signer"` |

use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    AUCTIONEER_SEED, AUCTIONEER_TRADE_STATE_PRICE, AUCTION_HOUSE_SEED, LISTING_SEED, OFFER_SEED,
    PURCHASE_TICKET_SEED, REWARD_CENTER_SEED, SIGNER_SEED,
};
use crate::host::ProgramRegistry;
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

/// A derived address together with its bump seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pda {
    pub address: Pubkey,
    pub bump: u8,
}

impl From<Pda> for Pubkey {
    fn from(pda: Pda) -> Self {
        pda.address
    }
}

/// Find the canonical address for `seeds` under `program_id`
///
/// Fails with [`RewardCenterError::DerivationExhausted`] when no bump in
/// `[0, 255]` yields an off-curve address.
pub fn find_pda(seeds: &[&[u8]], program_id: &Pubkey) -> RewardCenterResult<Pda> {
    Pubkey::try_find_program_address(seeds, program_id)
        .map(|(address, bump)| Pda { address, bump })
        .ok_or_else(|| {
            RewardCenterError::derivation_exhausted(seeds.first().copied().unwrap_or(&[]))
        })
}

// ============================================================================
// Reward center program
// ============================================================================

pub fn derive_reward_center(
    auction_house: &Pubkey,
    program_id: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(&[REWARD_CENTER_SEED, auction_house.as_ref()], program_id)
}

pub fn derive_listing(
    seller: &Pubkey,
    metadata: &Pubkey,
    reward_center: &Pubkey,
    program_id: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(
        &[
            LISTING_SEED,
            seller.as_ref(),
            metadata.as_ref(),
            reward_center.as_ref(),
        ],
        program_id,
    )
}

pub fn derive_offer(
    buyer: &Pubkey,
    metadata: &Pubkey,
    reward_center: &Pubkey,
    program_id: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(
        &[
            OFFER_SEED,
            buyer.as_ref(),
            metadata.as_ref(),
            reward_center.as_ref(),
        ],
        program_id,
    )
}

pub fn derive_purchase_ticket(
    listing: &Pubkey,
    offer: &Pubkey,
    program_id: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(
        &[PURCHASE_TICKET_SEED, listing.as_ref(), offer.as_ref()],
        program_id,
    )
}

// ============================================================================
// Auction house program
// ============================================================================

pub fn derive_auctioneer(
    auction_house: &Pubkey,
    reward_center: &Pubkey,
    auction_house_program: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(
        &[AUCTIONEER_SEED, auction_house.as_ref(), reward_center.as_ref()],
        auction_house_program,
    )
}

/// Seeds shared by priced and auctioneer trade states
#[derive(Debug, Clone, Copy)]
pub struct TradeStateSeeds<'a> {
    pub wallet: &'a Pubkey,
    pub auction_house: &'a Pubkey,
    pub token_account: &'a Pubkey,
    pub treasury_mint: &'a Pubkey,
    pub token_mint: &'a Pubkey,
    pub token_size: u64,
}

/// Trade state at a concrete base-unit price
pub fn derive_trade_state(
    seeds: TradeStateSeeds<'_>,
    price: u64,
    auction_house_program: &Pubkey,
) -> RewardCenterResult<Pda> {
    let price_bytes = price.to_le_bytes();
    let size_bytes = seeds.token_size.to_le_bytes();
    find_pda(
        &[
            AUCTION_HOUSE_SEED,
            seeds.wallet.as_ref(),
            seeds.auction_house.as_ref(),
            seeds.token_account.as_ref(),
            seeds.treasury_mint.as_ref(),
            seeds.token_mint.as_ref(),
            &price_bytes,
            &size_bytes,
        ],
        auction_house_program,
    )
}

/// Trade state owned by an auctioneer, which always seeds the max-u64 price
pub fn derive_auctioneer_trade_state(
    seeds: TradeStateSeeds<'_>,
    auction_house_program: &Pubkey,
) -> RewardCenterResult<Pda> {
    derive_trade_state(seeds, AUCTIONEER_TRADE_STATE_PRICE, auction_house_program)
}

pub fn derive_buyer_escrow(
    auction_house: &Pubkey,
    wallet: &Pubkey,
    auction_house_program: &Pubkey,
) -> RewardCenterResult<Pda> {
    find_pda(
        &[AUCTION_HOUSE_SEED, auction_house.as_ref(), wallet.as_ref()],
        auction_house_program,
    )
}

pub fn derive_program_as_signer(auction_house_program: &Pubkey) -> RewardCenterResult<Pda> {
    find_pda(&[AUCTION_HOUSE_SEED, SIGNER_SEED], auction_house_program)
}

// ============================================================================
// Facade
// ============================================================================

/// Address derivation bound to a program registry
///
/// Applies the reward center program id to reward center derivations and the
/// auction house program id to auctioneer derivations.
#[derive(Debug, Clone, Copy)]
pub struct RewardCenterPdas {
    programs: ProgramRegistry,
}

impl RewardCenterPdas {
    pub fn new(programs: ProgramRegistry) -> Self {
        Self { programs }
    }

    pub fn programs(&self) -> &ProgramRegistry {
        &self.programs
    }

    pub fn reward_center(&self, auction_house: &Pubkey) -> RewardCenterResult<Pda> {
        derive_reward_center(auction_house, &self.programs.reward_center)
    }

    pub fn listing_address(
        &self,
        seller: &Pubkey,
        metadata: &Pubkey,
        reward_center: &Pubkey,
    ) -> RewardCenterResult<Pda> {
        derive_listing(seller, metadata, reward_center, &self.programs.reward_center)
    }

    pub fn offer_address(
        &self,
        buyer: &Pubkey,
        metadata: &Pubkey,
        reward_center: &Pubkey,
    ) -> RewardCenterResult<Pda> {
        derive_offer(buyer, metadata, reward_center, &self.programs.reward_center)
    }

    pub fn auctioneer_address(
        &self,
        auction_house: &Pubkey,
        reward_center: &Pubkey,
    ) -> RewardCenterResult<Pda> {
        derive_auctioneer(auction_house, reward_center, &self.programs.auction_house)
    }

    pub fn auctioneer_trade_state_address(
        &self,
        seeds: TradeStateSeeds<'_>,
    ) -> RewardCenterResult<Pda> {
        derive_auctioneer_trade_state(seeds, &self.programs.auction_house)
    }

    pub fn purchase_ticket_address(
        &self,
        listing: &Pubkey,
        offer: &Pubkey,
    ) -> RewardCenterResult<Pda> {
        derive_purchase_ticket(listing, offer, &self.programs.reward_center)
    }

    pub fn trade_state(&self, seeds: TradeStateSeeds<'_>, price: u64) -> RewardCenterResult<Pda> {
        derive_trade_state(seeds, price, &self.programs.auction_house)
    }

    pub fn buyer_escrow(&self, auction_house: &Pubkey, wallet: &Pubkey) -> RewardCenterResult<Pda> {
        derive_buyer_escrow(auction_house, wallet, &self.programs.auction_house)
    }

    pub fn program_as_signer(&self) -> RewardCenterResult<Pda> {
        derive_program_as_signer(&self.programs.auction_house)
    }
}

impl Default for RewardCenterPdas {
    fn default() -> Self {
        Self::new(ProgramRegistry::default())
    }
}
