//! Configuration for BuscaCEP.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::BuscaCepResult;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "buscacep.toml";

/// Main configuration for BuscaCEP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Lookup API settings.
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// ViaCEP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL; the CEP goes in the path: `{base_url}/{cep}/json`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (in seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl LookupConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("buscacep/{}", env!("CARGO_PKG_VERSION"))
}

/// Cache, history and saved-list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per persisted key.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Cache entry time to live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum number of history entries kept.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Maximum number of saved addresses kept.
    #[serde(default = "default_max_saved")]
    pub max_saved: usize,

    /// Entries shown by history/saved listings.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl StorageConfig {
    /// Cache time to live as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl(),
            max_history: default_max_history(),
            max_saved: default_max_saved(),
            list_limit: default_list_limit(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("buscacep"))
        .unwrap_or_else(|| PathBuf::from(".buscacep"))
}

fn default_cache_ttl() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_max_history() -> usize {
    10
}

fn default_max_saved() -> usize {
    20
}

fn default_list_limit() -> usize {
    5
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> BuscaCepResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> BuscaCepResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            lookup: LookupConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Loads `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|_| Self::default_config())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
