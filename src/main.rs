//! Reward Center Client CLI
//!
//! Operator tooling around the client library: derive program addresses and
//! check that the configured RPC endpoint, wallet and lookup table are usable
//! before running marketplace operations.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reward_center_client::{
    config::Config, host::ChainRpc, pdas::RewardCenterPdas, wallet::WalletManager, Pda, Pubkey,
    SolanaRpcHost, TradeStateSeeds,
};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive a program address and print it with its bump
    Derive {
        #[command(subcommand)]
        target: DeriveTarget,
    },
    /// Check RPC connectivity, wallet and lookup table
    Preflight {
        /// Address lookup table the operations will use
        #[arg(long)]
        lookup_table: Option<Pubkey>,
    },
}

#[derive(Subcommand, Debug)]
enum DeriveTarget {
    RewardCenter {
        #[arg(long)]
        auction_house: Pubkey,
    },
    Listing {
        #[arg(long)]
        seller: Pubkey,
        #[arg(long)]
        metadata: Pubkey,
        #[arg(long)]
        reward_center: Pubkey,
    },
    Offer {
        #[arg(long)]
        buyer: Pubkey,
        #[arg(long)]
        metadata: Pubkey,
        #[arg(long)]
        reward_center: Pubkey,
    },
    Auctioneer {
        #[arg(long)]
        auction_house: Pubkey,
        #[arg(long)]
        reward_center: Pubkey,
    },
    PurchaseTicket {
        #[arg(long)]
        listing: Pubkey,
        #[arg(long)]
        offer: Pubkey,
    },
    TradeState {
        #[arg(long)]
        wallet: Pubkey,
        #[arg(long)]
        auction_house: Pubkey,
        #[arg(long)]
        token_account: Pubkey,
        #[arg(long)]
        treasury_mint: Pubkey,
        #[arg(long)]
        token_mint: Pubkey,
        /// Price in base units
        #[arg(long)]
        price: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.json)?;

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    let config = load_config(&args.config)?;

    match args.command {
        Command::Derive { target } => {
            let pdas = RewardCenterPdas::new(config.program_registry()?);
            let pda = derive(&pdas, target)?;
            println!("{} {}", pda.address, pda.bump);
        }
        Command::Preflight { lookup_table } => preflight(&config, lookup_table).await?,
    }

    Ok(())
}

fn derive(pdas: &RewardCenterPdas, target: DeriveTarget) -> Result<Pda> {
    let pda = match target {
        DeriveTarget::RewardCenter { auction_house } => pdas.reward_center(&auction_house)?,
        DeriveTarget::Listing {
            seller,
            metadata,
            reward_center,
        } => pdas.listing_address(&seller, &metadata, &reward_center)?,
        DeriveTarget::Offer {
            buyer,
            metadata,
            reward_center,
        } => pdas.offer_address(&buyer, &metadata, &reward_center)?,
        DeriveTarget::Auctioneer {
            auction_house,
            reward_center,
        } => pdas.auctioneer_address(&auction_house, &reward_center)?,
        DeriveTarget::PurchaseTicket { listing, offer } => {
            pdas.purchase_ticket_address(&listing, &offer)?
        }
        DeriveTarget::TradeState {
            wallet,
            auction_house,
            token_account,
            treasury_mint,
            token_mint,
            price,
        } => pdas.trade_state(
            TradeStateSeeds {
                wallet: &wallet,
                auction_house: &auction_house,
                token_account: &token_account,
                treasury_mint: &treasury_mint,
                token_mint: &token_mint,
                token_size: reward_center_client::constants::TOKEN_SIZE,
            },
            price,
        )?,
    };
    Ok(pda)
}

async fn preflight(config: &Config, lookup_table: Option<Pubkey>) -> Result<()> {
    config.validate()?;

    info!("Initializing wallet from: {}", config.wallet.keypair_path);
    let wallet =
        WalletManager::from_file(&config.wallet.keypair_path).context("Failed to load wallet")?;
    info!("Wallet address: {}", wallet.pubkey());

    let commitment = config.commitment()?;
    let host = SolanaRpcHost::new(config.rpc.url.clone(), commitment, config.poll_interval());
    let blockhash = host
        .latest_blockhash(commitment)
        .await
        .with_context(|| format!("RPC endpoint {} is unreachable", config.rpc.url))?;
    info!(
        blockhash = %blockhash.blockhash,
        last_valid_block_height = blockhash.last_valid_block_height,
        "RPC endpoint reachable"
    );

    if let Some(address) = lookup_table {
        match host.address_lookup_table(&address).await? {
            Some(table) => info!(
                lookup_table = %address,
                addresses = table.addresses.len(),
                "Lookup table found"
            ),
            None => anyhow::bail!("Lookup table {} not found", address),
        }
    }

    info!("Preflight passed");
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = if verbose {
        "reward_center_client=debug,info"
    } else {
        "reward_center_client=info,warn,error"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

/// Load configuration from file, falling back to defaults when absent
fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        warn!("Config file {} not found, using defaults", path);
        let mut config = Config::default();
        dotenvy::dotenv().ok();
        config.apply_env_overrides();
        return Ok(config);
    }
    Config::from_file_with_env(path)
}
