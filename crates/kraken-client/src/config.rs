//! Client configuration with environment overrides.

use std::time::Duration;

use crate::version::ApiVersion;

pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/kraken";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`crate::Kraken::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub base_url: String,
    pub version: ApiVersion,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            version: ApiVersion::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, version: ApiVersion) -> Self {
        Self {
            client_id: client_id.into(),
            version,
            ..Self::default()
        }
    }

    /// Load from `TWITCH_CLIENT_ID`, `KRAKEN_BASE_URL`, `KRAKEN_API_VERSION`
    /// and `KRAKEN_TIMEOUT_SECS`. Missing or unparsable values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let g = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let version = match g("KRAKEN_API_VERSION") {
            Some(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid KRAKEN_API_VERSION, using default");
                defaults.version
            }),
            None => defaults.version,
        };

        Self {
            client_id: g("TWITCH_CLIENT_ID").unwrap_or_default(),
            base_url: g("KRAKEN_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            version,
            timeout: g("KRAKEN_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
