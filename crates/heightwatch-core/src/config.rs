//! heightwatch.toml configuration parser.
//!
//! Every field is optional; missing fields fall back to the defaults
//! exposed by the accessor methods.
//!
//! ```toml
//! [registry]
//! url = "https://example.org/pools.json"
//! refresh_interval = "1h"
//!
//! [poller]
//! interval = "30s"
//! timeout = "10s"
//!
//! [discord]
//! token_file = "token.txt"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/turtlecoin/turtlecoin-pools-json/master/turtlecoin-pools.json";
pub const DEFAULT_REGISTRY_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TOKEN_FILE: &str = "token.txt";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeightwatchConfig {
    pub registry: Option<RegistryConfig>,
    pub poller: Option<PollerConfig>,
    pub discord: Option<DiscordConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    pub url: Option<String>,
    pub refresh_interval: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollerConfig {
    pub interval: Option<String>,
    pub timeout: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordConfig {
    pub token_file: Option<PathBuf>,
}

impl HeightwatchConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HeightwatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject durations that would fail later, so bad config surfaces at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry_interval()?;
        self.poll_interval()?;
        self.request_timeout()?;
        Ok(())
    }

    pub fn registry_url(&self) -> &str {
        self.registry
            .as_ref()
            .and_then(|r| r.url.as_deref())
            .unwrap_or(DEFAULT_REGISTRY_URL)
    }

    pub fn registry_interval(&self) -> Result<Duration, ConfigError> {
        let raw = self.registry.as_ref().and_then(|r| r.refresh_interval.as_deref());
        resolve_duration("registry.refresh_interval", raw, DEFAULT_REGISTRY_INTERVAL)
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let raw = self.poller.as_ref().and_then(|p| p.interval.as_deref());
        resolve_duration("poller.interval", raw, DEFAULT_POLL_INTERVAL)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        let raw = self.poller.as_ref().and_then(|p| p.timeout.as_deref());
        resolve_duration("poller.timeout", raw, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn user_agent(&self) -> String {
        self.poller
            .as_ref()
            .and_then(|p| p.user_agent.clone())
            .unwrap_or_else(|| format!("heightwatch/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn token_file(&self) -> PathBuf {
        self.discord
            .as_ref()
            .and_then(|d| d.token_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE))
    }
}

fn resolve_duration(
    field: &'static str,
    raw: Option<&str>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => parse_duration(value)
            .filter(|d| !d.is_zero())
            .ok_or_else(|| ConfigError::InvalidDuration {
                field,
                value: value.to_string(),
            }),
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "1h".
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60)).map(Duration::from_secs)
    } else if let Some(hours) = s.strip_suffix('h') {
        hours.parse::<u64>().ok().and_then(|h| h.checked_mul(3600)).map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
