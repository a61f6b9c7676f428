//! Configuration loading
//!
//! Configuration comes from a TOML file with serde defaults, optionally
//! overridden by environment variables (a `.env` file is honoured).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    AUCTION_HOUSE_PROGRAM_ID, DEFAULT_COMPUTE_UNIT_LIMIT, MAX_COMPUTE_UNIT_LIMIT,
    REWARD_CENTER_PROGRAM_ID,
};
use crate::host::ProgramRegistry;
use crate::tx_builder::{RewardCenterError, RewardCenterResult};

pub const RPC_URL_ENV: &str = "REWARD_CENTER_RPC_URL";
pub const KEYPAIR_ENV: &str = "REWARD_CENTER_KEYPAIR";

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,

    #[serde(default)]
    pub programs: ProgramsConfig,

    #[serde(default)]
    pub transaction: TransactionConfig,

    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// `processed`, `confirmed` or `finalized`
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Interval between signature status polls while confirming
    #[serde(default = "default_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramsConfig {
    #[serde(default = "default_reward_center_program")]
    pub reward_center: String,

    #[serde(default = "default_auction_house_program")]
    pub auction_house: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Compute unit limit requested by settlement operations
    #[serde(default = "default_compute_unit_limit")]
    pub compute_unit_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletConfig {
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

fn default_rpc_url() -> String { "https://api.mainnet-beta.solana.com".to_string() }
fn default_commitment() -> String { "finalized".to_string() }
fn default_poll_interval_ms() -> u64 { 500 }
fn default_reward_center_program() -> String { REWARD_CENTER_PROGRAM_ID.to_string() }
fn default_auction_house_program() -> String { AUCTION_HOUSE_PROGRAM_ID.to_string() }
fn default_compute_unit_limit() -> u32 { DEFAULT_COMPUTE_UNIT_LIMIT }
fn default_keypair_path() -> String { "~/.config/solana/id.json".to_string() }

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            commitment: default_commitment(),
            confirm_poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            reward_center: default_reward_center_program(),
            auction_house: default_auction_house_program(),
        }
    }
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            compute_unit_limit: default_compute_unit_limit(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            self.rpc.url = url;
        }
        if let Ok(path) = std::env::var(KEYPAIR_ENV) {
            self.wallet.keypair_path = path;
        }
    }

    pub fn validate(&self) -> RewardCenterResult<()> {
        if self.rpc.url.trim().is_empty() {
            return Err(RewardCenterError::Configuration("rpc.url is empty".to_string()));
        }
        self.commitment()?;
        self.program_registry()?;
        let limit = self.transaction.compute_unit_limit;
        if limit == 0 || limit > MAX_COMPUTE_UNIT_LIMIT {
            return Err(RewardCenterError::Configuration(format!(
                "transaction.compute_unit_limit must be in 1..={}, got {}",
                MAX_COMPUTE_UNIT_LIMIT, limit
            )));
        }
        Ok(())
    }

    pub fn commitment(&self) -> RewardCenterResult<CommitmentConfig> {
        CommitmentConfig::from_str(&self.rpc.commitment).map_err(|_| {
            RewardCenterError::Configuration(format!(
                "unknown rpc.commitment '{}'",
                self.rpc.commitment
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.rpc.confirm_poll_interval_ms)
    }

    pub fn program_registry(&self) -> RewardCenterResult<ProgramRegistry> {
        Ok(ProgramRegistry {
            reward_center: parse_pubkey("programs.reward_center", &self.programs.reward_center)?,
            auction_house: parse_pubkey("programs.auction_house", &self.programs.auction_house)?,
        })
    }
}

fn parse_pubkey(field: &str, value: &str) -> RewardCenterResult<Pubkey> {
    Pubkey::from_str(value).map_err(|e| {
        RewardCenterError::Configuration(format!(
            "{} '{}' is not a valid pubkey: {}",
            field, value, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.commitment().unwrap(), CommitmentConfig::finalized());
        assert_eq!(config.program_registry().unwrap(), ProgramRegistry::default());
        assert_eq!(config.transaction.compute_unit_limit, 400_000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rpc]\nurl = \"http://localhost:8899\"\ncommitment = \"confirmed\"\n\n[transaction]\ncompute_unit_limit = 600000"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rpc.url, "http://localhost:8899");
        assert_eq!(config.commitment().unwrap(), CommitmentConfig::confirmed());
        assert_eq!(config.rpc.confirm_poll_interval_ms, 500);
        assert_eq!(config.transaction.compute_unit_limit, 600_000);
        assert_eq!(config.wallet, WalletConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.transaction.compute_unit_limit = 1_400_001;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.programs.auction_house = "not-a-key".to_string();
        assert!(matches!(
            config.validate(),
            Err(RewardCenterError::Configuration(_))
        ));

        let mut config = Config::default();
        config.rpc.commitment = "eventually".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Config::from_file("/nonexistent/reward-center.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
