//! Configuration Loader
//!
//! Loads and validates the router's TOML configuration. Secrets and
//! per-machine values can be overridden from the environment (`.env`).

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::adapters::curve::{DEVNET_PROGRAM_ID, MAINNET_PROGRAM_ID};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub network: NetworkSection,
    pub wallet: WalletSection,
    #[serde(default)]
    pub program: ProgramSection,
    pub backend: BackendSection,
    #[serde(default)]
    pub swap: SwapSection,
    #[serde(default)]
    pub refresh: RefreshSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
}

/// Solana network section
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSection {
    pub cluster: Cluster,
    pub rpc_url: String,
    /// "processed", "confirmed" or "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

impl NetworkSection {
    /// SOLANA_RPC_URL wins over the file
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, ConfigError> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| ConfigError::ValidationError(format!("unknown commitment '{}'", self.commitment)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletSection {
    /// Keypair JSON file (NEVER commit this file!)
    pub keypair_path: String,
}

impl WalletSection {
    /// SOLANA_KEYPAIR_PATH wins over the file; `~` is expanded
    pub fn get_keypair_path(&self) -> String {
        let raw = std::env::var("SOLANA_KEYPAIR_PATH").unwrap_or_else(|_| self.keypair_path.clone());
        shellexpand::tilde(&raw).to_string()
    }
}

/// Launchpad program section
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramSection {
    /// Overrides the cluster default
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,
}

impl Default for ProgramSection {
    fn default() -> Self {
        Self {
            program_id: None,
            token_decimals: default_token_decimals(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    pub api_url: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
    /// Sent as `userId` on token and thread reads
    #[serde(default)]
    pub user_id: Option<String>,
}

impl BackendSection {
    /// BACKEND_API_URL wins over the file
    pub fn get_api_url(&self) -> String {
        std::env::var("BACKEND_API_URL").unwrap_or_else(|_| self.api_url.clone())
    }
}

/// Jupiter section, used once a pool has left the curve
#[derive(Debug, Clone, Deserialize)]
pub struct SwapSection {
    #[serde(default = "default_swap_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    #[serde(default)]
    pub priority_fee_lamports: Option<u64>,
}

impl Default for SwapSection {
    fn default() -> Self {
        Self {
            api_url: default_swap_api_url(),
            api_key: None,
            slippage_bps: default_slippage_bps(),
            priority_fee_lamports: None,
        }
    }
}

impl SwapSection {
    /// Config value first, then JUPITER_API_KEY
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("JUPITER_API_KEY").ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSection {
    /// Delay between `watch` refreshes
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// "trace", "debug", "info", "warn" or "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_token_decimals() -> u8 {
    crate::domain::TOKEN_DECIMALS
}

fn default_backend_timeout() -> u64 {
    15
}

fn default_swap_api_url() -> String {
    "https://api.jup.ag/swap/v1".to_string()
}

fn default_slippage_bps() -> u16 {
    100
}

fn default_refresh_interval() -> u64 {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Launchpad program id: explicit override or the cluster default
    pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
        match self.program.program_id {
            Some(ref id) => Pubkey::from_str(id)
                .map_err(|e| ConfigError::ValidationError(format!("invalid program_id '{}': {}", id, e))),
            None => Ok(match self.network.cluster {
                Cluster::Mainnet => MAINNET_PROGRAM_ID,
                Cluster::Devnet => DEVNET_PROGRAM_ID,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError("rpc_url cannot be empty".to_string()));
        }
        self.network.commitment_config()?;

        if self.wallet.keypair_path.is_empty() {
            return Err(ConfigError::ValidationError("keypair_path cannot be empty".to_string()));
        }

        self.program_id()?;
        if self.program.token_decimals > 18 {
            return Err(ConfigError::ValidationError(format!(
                "token_decimals must be <= 18, got {}",
                self.program.token_decimals
            )));
        }

        if self.backend.api_url.is_empty() {
            return Err(ConfigError::ValidationError("backend api_url cannot be empty".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("backend timeout_secs must be > 0".to_string()));
        }

        if self.swap.api_url.is_empty() {
            return Err(ConfigError::ValidationError("swap api_url cannot be empty".to_string()));
        }
        if self.swap.slippage_bps == 0 || self.swap.slippage_bps > 10_000 {
            return Err(ConfigError::ValidationError(format!(
                "slippage_bps must be 1-10000, got {}",
                self.swap.slippage_bps
            )));
        }

        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::ValidationError("refresh interval_secs must be > 0".to_string()));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}
