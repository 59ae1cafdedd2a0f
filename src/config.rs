//! Configuration management for the ledger node

use crate::error::ChainError;
use crate::primitives::WalletAddress;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Database path that selects the in-memory chain store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub mempool: MempoolConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_max_amount")]
    pub max_amount: i64,
    #[serde(default = "default_max_tx_size")]
    pub max_tx_size: usize,
    #[serde(default)]
    pub blocked_addresses: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_amount: default_max_amount(),
            max_tx_size: default_max_tx_size(),
            blocked_addresses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    #[serde(default = "default_balance")]
    pub default_balance: u64,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            default_balance: default_balance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolConfig {
    #[serde(default = "default_mempool_size")]
    pub max_size: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_size: default_mempool_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_amount() -> i64 {
    1000
}

fn default_max_tx_size() -> usize {
    10_000
}

fn default_balance() -> u64 {
    2000
}

fn default_mempool_size() -> usize {
    crate::mempool::DEFAULT_MAX_SIZE
}

fn default_database_path() -> String {
    "./data/ledger.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_toml_str(config_str: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn uses_in_memory_database(&self) -> bool {
        self.database.path == IN_MEMORY_DATABASE
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.policy.max_amount <= 0 {
            return Err(ChainError::ConfigError(
                "policy.max_amount must be positive".to_string(),
            ));
        }
        if self.policy.max_tx_size == 0 {
            return Err(ChainError::ConfigError(
                "policy.max_tx_size must be positive".to_string(),
            ));
        }
        for raw in &self.policy.blocked_addresses {
            WalletAddress::new(raw.as_str()).map_err(|e| {
                ChainError::ConfigError(format!("policy.blocked_addresses: {}", e))
            })?;
        }
        if self.mempool.max_size == 0 {
            return Err(ChainError::ConfigError(
                "mempool.max_size must be positive".to_string(),
            ));
        }
        if self.database.path.is_empty() {
            return Err(ChainError::ConfigError(
                "database.path must be set in config.toml".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ChainError::ConfigError(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }
        Ok(())
    }
}

/// Reads the TOML file at `path`. A missing file yields the built-in defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    Config::from_toml_str(&config_str)
}
