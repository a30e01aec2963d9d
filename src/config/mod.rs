use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::MarketContract;

pub const DEFAULT_RPC: &str = "https://fullnode.testnet.aptoslabs.com/v1";
pub const DEFAULT_MARKETPLACE: &str =
    "0x223d508f051f5869e232658de4a25c493813273319b5130ae54838c609be630d";
pub const DEFAULT_MODULE_NAME: &str = "NFTMarketplace";

/// On-disk config; every field optional. CLI flags are folded into the same shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub rpc: Option<String>,
    pub signer: Option<String>,
    pub marketplace_address: Option<String>,
    pub module_address: Option<String>,
    pub module_name: Option<String>,
    pub feedback_secs: Option<u64>,
    pub confirmation_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Field-wise `self` over `fallback`
    pub fn or(self, fallback: Config) -> Config {
        Config {
            rpc: self.rpc.or(fallback.rpc),
            signer: self.signer.or(fallback.signer),
            marketplace_address: self.marketplace_address.or(fallback.marketplace_address),
            module_address: self.module_address.or(fallback.module_address),
            module_name: self.module_name.or(fallback.module_name),
            feedback_secs: self.feedback_secs.or(fallback.feedback_secs),
            confirmation_timeout_secs: self
                .confirmation_timeout_secs
                .or(fallback.confirmation_timeout_secs),
            poll_interval_ms: self.poll_interval_ms.or(fallback.poll_interval_ms),
            log_file: self.log_file.or(fallback.log_file),
        }
    }
}

/// Resolved settings handed to the service and the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub rpc_url: String,
    pub signer_url: Option<String>,
    pub contract: MarketContract,
    pub feedback: Duration,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig::from_config(Config::default())
    }
}

impl MarketConfig {
    pub fn from_config(config: Config) -> Self {
        let marketplace_address = non_empty(config.marketplace_address)
            .unwrap_or_else(|| DEFAULT_MARKETPLACE.to_string());
        // the module is published from the marketplace account unless told otherwise
        let module_address =
            non_empty(config.module_address).unwrap_or_else(|| marketplace_address.clone());
        Self {
            rpc_url: non_empty(config.rpc).unwrap_or_else(|| DEFAULT_RPC.to_string()),
            signer_url: non_empty(config.signer),
            contract: MarketContract {
                module_address,
                module_name: non_empty(config.module_name)
                    .unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string()),
                marketplace_address,
            },
            feedback: Duration::from_secs(config.feedback_secs.unwrap_or(5).max(1)),
            confirmation_timeout: Duration::from_secs(
                config.confirmation_timeout_secs.unwrap_or(20).max(1),
            ),
            poll_interval: Duration::from_millis(config.poll_interval_ms.unwrap_or(1000).max(50)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Error)]
#[error("invalid config file {path}: {source}")]
pub struct ConfigError {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

/// Read the config file. A missing file is an empty config; a malformed one is an error
/// and the caller decides whether to fall back to defaults.
pub fn load() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Ok(Config::default()),
    };
    parse(&content).map_err(|source| ConfigError {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("NFTMART_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("nftmart").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("nftmart").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "nftmart", "nftmart")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("nftmart"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("nftmart"));
    }
    directories::ProjectDirs::from("io", "nftmart", "nftmart")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("nftmart.log"))
}

pub fn exports_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("exports"))
}
