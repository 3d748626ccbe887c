use anyhow::{Context, Result};
use pipe_core::{DEFAULT_LIMIT, DEFAULT_TIMEOUT, KIND_ARTICLE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the republish signing key (nsec or hex).
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

pub const DEFAULT_CONFIG_PATH: &str = "nostr-pipe.toml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueryConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_kinds")]
    pub kinds: Vec<u16>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PublishConfig {
    /// Destination relay for `republish`; falls back to `relay.url`.
    pub relay: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            kinds: default_kinds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_relay_url() -> String {
    "wss://relay.damus.io".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_kinds() -> Vec<u16> {
    vec![KIND_ARTICLE]
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn is_relay_url(url: &str) -> bool {
    url.starts_with("wss://") || url.starts_with("ws://")
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(path);
        let content = fs::read_to_string(expanded_path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path))?;

        toml::from_str(&content).with_context(|| "Failed to parse TOML config")
    }

    /// Load `path` when given, else the default file if present, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_relay_url(&self.relay.url) {
            anyhow::bail!("Relay URL must start with ws:// or wss://");
        }

        if let Some(relay) = &self.publish.relay {
            if !is_relay_url(relay) {
                anyhow::bail!("Publish relay URL must start with ws:// or wss://");
            }
        }

        if self.query.limit == 0 {
            anyhow::bail!("Query limit must be positive");
        }

        if self.relay.timeout_secs == 0 {
            anyhow::bail!("Relay timeout must be positive");
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.relay.timeout_secs)
    }

    /// Relay `republish` writes to.
    pub fn publish_relay(&self) -> &str {
        self.publish.relay.as_deref().unwrap_or(&self.relay.url)
    }

    /// The signing key from the environment. Only `republish` needs it.
    pub fn signing_key() -> Result<String> {
        std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{PRIVATE_KEY_ENV} must be set to republish"))
    }
}
