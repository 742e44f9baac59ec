//! Configuration management

use std::{env, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Upper bound on transactions shown per lookup.
pub const MAX_PAGE_SIZE: usize = 5;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Environment files to load before processing config.
    /// Paths support ~ expansion. Loaded in order, later files override earlier.
    /// Variables are set into the process environment for `${VAR}` resolution.
    pub env_files: Vec<String>,
    /// Etherscan-compatible API (addresses starting with `0x`)
    pub etherscan: EtherscanConfig,
    /// Solscan-compatible API (every other address)
    pub solscan: SolscanConfig,
    /// Outbound HTTP settings
    pub http: HttpConfig,
    /// Lookup settings
    pub lookup: LookupConfig,
}

/// Etherscan API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtherscanConfig {
    /// Full endpoint URL (the `module`/`action` query is appended)
    pub base_url: String,
    /// API key. Supports `${VAR}` and `${VAR:-default}`.
    pub api_key: String,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/api".to_string(),
            api_key: "${ETHERSCAN_API_KEY}".to_string(),
        }
    }
}

/// Solscan API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolscanConfig {
    /// Base URL; `/account/...` paths are appended
    pub base_url: String,
}

impl Default for SolscanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://public-api.solscan.io".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("wallet-explorer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Number of recent transactions to show (1..=5)
    pub page_size: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // WALLET_EXPLORER_ETHERSCAN__API_KEY -> etherscan.api_key
        figment = figment.merge(Env::prefixed("WALLET_EXPLORER_").split("__"));

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Env files must be in the process environment before expansion
        config.load_env_files();
        config.expand_env_vars()?;

        Ok(config)
    }

    /// Load environment files into the process environment.
    /// Supports ~ expansion. Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => tracing::info!("Loaded env file: {expanded}"),
                    Err(e) => tracing::warn!("Failed to load env file {expanded}: {e}"),
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }

    /// Expand ${VAR} and ${VAR:-default} patterns in config values
    fn expand_env_vars(&mut self) -> Result<()> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
            .map_err(|e| Error::Config(e.to_string()))?;

        self.etherscan.api_key = Self::expand_string(&re, &self.etherscan.api_key);
        self.etherscan.base_url = Self::expand_string(&re, &self.etherscan.base_url);
        self.solscan.base_url = Self::expand_string(&re, &self.solscan.base_url);
        Ok(())
    }

    /// Expand environment variables in a string
    fn expand_string(re: &Regex, value: &str) -> String {
        re.replace_all(value, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default = caps.get(2).map_or("", |m| m.as_str());
            env::var(var_name).unwrap_or_else(|_| default.to_string())
        })
        .into_owned()
    }

    /// Check that everything a lookup needs is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable base URL, an out-of-range page
    /// size, or a missing Etherscan API key.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("etherscan.base_url", &self.etherscan.base_url),
            ("solscan.base_url", &self.solscan.base_url),
        ] {
            Url::parse(value).map_err(|e| Error::Config(format!("{name} {value:?}: {e}")))?;
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.lookup.page_size) {
            return Err(Error::Config(format!(
                "lookup.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.lookup.page_size
            )));
        }

        if self.etherscan.api_key.trim().is_empty() {
            return Err(Error::Config(
                "etherscan.api_key is empty; set ETHERSCAN_API_KEY or WALLET_EXPLORER_ETHERSCAN__API_KEY"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Custom humantime serde module for Duration
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize Duration to human-readable string (e.g., "30s", "250ms")
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the serializer fails.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    /// Deserialize human-readable duration string (e.g., "30s", "5m", "100ms")
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the string cannot be parsed as a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        // "ms" first, it also ends in 's'
        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(serde::de::Error::custom)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(serde::de::Error::custom)
        } else {
            // Assume seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        }
    }
}
