//! Configuration loading and management for news-tldr.
//!
//! Loads settings from `news-tldr.toml` with environment variable overrides
//! for sensitive data. Every section has built-in defaults, so the tool
//! works without a config file at all.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Compute device for model inference.
///
/// Serialised as a plain integer in the transformers convention: CPU is
/// -1, GPUs are indexed from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "i64", into = "i64")]
pub enum Device {
    #[default]
    Cpu,
    Gpu(u32),
}

impl Device {
    /// Device index in the transformers pipeline convention.
    pub fn index(&self) -> i64 {
        match self {
            Device::Cpu => -1,
            Device::Gpu(i) => i64::from(*i),
        }
    }
}

impl From<i64> for Device {
    fn from(index: i64) -> Self {
        if index < 0 {
            Device::Cpu
        } else {
            Device::Gpu(index as u32)
        }
    }
}

impl From<Device> for i64 {
    fn from(device: Device) -> Self {
        device.index()
    }
}

/// Summarisation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier (a Hugging Face model id)
    pub model: String,
    /// Compute device, forwarded to self-hosted pipeline endpoints
    pub device: Device,
    /// Self-hosted inference endpoint; the hosted inference API is used
    /// when absent
    pub endpoint: Option<String>,
    /// API token for the hosted inference API
    pub api_token: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "sshleifer/distilbart-cnn-12-6".to_string(),
            device: Device::Cpu,
            endpoint: None,
            api_token: None,
        }
    }
}

/// Summary output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Approximate maximum TL;DR length in characters
    pub max_chars: usize,
    /// Maximum number of articles to summarise in digest mode
    pub max_articles: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: 300,
            max_articles: 5,
        }
    }
}

/// Feed source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// Ordered list of RSS/Atom feed URLs queried in digest mode
    pub urls: Vec<String>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            urls: default_feeds(),
        }
    }
}

/// The default feed list: BBC news feeds, global and regional.
fn default_feeds() -> Vec<String> {
    [
        "https://feeds.bbci.co.uk/news/rss.xml",
        "https://feeds.bbci.co.uk/news/world/rss.xml",
        "https://feeds.bbci.co.uk/news/uk/rss.xml",
        "https://feeds.bbci.co.uk/news/world/europe/rss.xml",
        "https://feeds.bbci.co.uk/news/world/asia/rss.xml",
        "https://feeds.bbci.co.uk/news/world/us_and_canada/rss.xml",
        "https://feeds.bbci.co.uk/news/world/middle_east/rss.xml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub summary: SummaryConfig,
    pub feeds: FeedsConfig,
}

impl Config {
    /// Load configuration from the default location (news-tldr.toml in cwd
    /// or `~/.config/news-tldr/`), falling back to defaults when no file
    /// exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env_overrides();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override sensitive settings from environment variables
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            self.model.api_token = Some(token);
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from("news-tldr.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home
                .join(".config")
                .join("news-tldr")
                .join("news-tldr.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }
}
