use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root of the Dune REST API
pub const BASE_URL: &str = "https://api.dune.com/api/v1";

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "x-dune-api-key";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DUNE_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// HTTP transport settings.
///
/// Every field is optional so that a partial value can be layered over the
/// defaults with [`TransportConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Default headers sent with every request. Names compare case-insensitively.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Whole-request timeout; unset leaves the HTTP client's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_verify: Option<bool>,
}

impl TransportConfig {
    /// Defaults for talking to the public API with the given key
    pub fn defaults(api_key: &str) -> Self {
        let mut config = Self {
            base_url: Some(BASE_URL.to_string()),
            ..Self::default()
        };
        config.set_header("Content-Type", "application/json");
        config.set_header(API_KEY_HEADER, api_key);
        config
    }

    /// Builder-style override of the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builder-style header insertion
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Insert a header, replacing any existing entry whose name differs only in case
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Layer `overrides` on top of `self`. Values set in `overrides` win; keys
    /// it leaves unset keep their current value.
    pub fn merge(mut self, overrides: TransportConfig) -> Self {
        if overrides.base_url.is_some() {
            self.base_url = overrides.base_url;
        }
        for (name, value) in overrides.headers {
            self.set_header(name, value);
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        if overrides.connect_timeout_secs.is_some() {
            self.connect_timeout_secs = overrides.connect_timeout_secs;
        }
        if overrides.insecure_skip_verify.is_some() {
            self.insecure_skip_verify = overrides.insecure_skip_verify;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

/// Caller-side configuration: an API key plus transport overrides
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api_key: String,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            transport: TransportConfig::default(),
        }
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Read `DUNE_API_KEY`, `DUNE_BASE_URL` and `DUNE_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("DUNE_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        config.transport.base_url = lookup("DUNE_BASE_URL");

        if let Some(raw) = lookup("DUNE_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "DUNE_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.transport.timeout_secs = Some(secs);
        }

        Ok(config)
    }
}
