//! Benchmarks for address derivation and instruction assembly
//!
//! Derivation walks bumps from 255 downwards until an off-curve address is
//! found, so the settlement builders (which derive a dozen addresses) are the
//! hot path worth tracking.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, signature::Keypair};
use std::sync::Arc;

use reward_center_client::constants::TOKEN_SIZE;
use reward_center_client::operations::accept_offer::{self, AcceptOfferInput, AcceptOfferProbes};
use reward_center_client::price::to_base_units;
use reward_center_client::{AuctionHouseAccounts, DynSigner, RewardCenterPdas, TradeStateSeeds};

fn bench_derivations(c: &mut Criterion) {
    let pdas = RewardCenterPdas::default();
    let auction_house = Pubkey::new_unique();
    let seller = Pubkey::new_unique();
    let metadata = Pubkey::new_unique();
    let token_account = Pubkey::new_unique();
    let treasury_mint = Pubkey::new_unique();
    let token_mint = Pubkey::new_unique();

    c.bench_function("reward_center_and_listing", |b| {
        b.iter(|| {
            let reward_center = pdas.reward_center(black_box(&auction_house)).unwrap();
            pdas.listing_address(black_box(&seller), &metadata, &reward_center.address)
                .unwrap()
        })
    });

    c.bench_function("trade_state", |b| {
        let seeds = TradeStateSeeds {
            wallet: &seller,
            auction_house: &auction_house,
            token_account: &token_account,
            treasury_mint: &treasury_mint,
            token_mint: &token_mint,
            token_size: TOKEN_SIZE,
        };
        b.iter(|| pdas.trade_state(black_box(seeds), black_box(1_500_000_000)).unwrap())
    });
}

fn bench_accept_offer_build(c: &mut Criterion) {
    let pdas = RewardCenterPdas::default();
    let seller: DynSigner = Arc::new(Keypair::new());
    let input = AcceptOfferInput {
        amount: "1.5".to_string(),
        auction_house: AuctionHouseAccounts {
            address: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            fee_account: Pubkey::new_unique(),
            treasury_mint: Pubkey::new_unique(),
        },
        auction_house_treasury: Pubkey::new_unique(),
        token_mint: Pubkey::new_unique(),
        metadata: Pubkey::new_unique(),
        associated_token_account: Pubkey::new_unique(),
        reward_center_token: Pubkey::new_unique(),
        offer_buyer: Pubkey::new_unique(),
        creators: (0..3)
            .map(|_| AccountMeta::new(Pubkey::new_unique(), false))
            .collect(),
        seller: None,
        address_lookup_table: Pubkey::new_unique(),
    };
    let probes = AcceptOfferProbes {
        listing_exists: true,
        seller_reward_account_exists: false,
    };

    c.bench_function("accept_offer_build", |b| {
        b.iter(|| {
            accept_offer::build(&pdas, black_box(&input), &seller, None, 400_000, probes).unwrap()
        })
    });

    c.bench_function("to_base_units", |b| {
        b.iter(|| to_base_units(black_box("18446744073.709551615")).unwrap())
    });
}

criterion_group!(benches, bench_derivations, bench_accept_offer_build);
criterion_main!(benches);
