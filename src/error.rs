//! Error types for wallet lookups

use thiserror::Error;

/// Result type alias for wallet lookups
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the address field is empty.
pub const EMPTY_ADDRESS_MESSAGE: &str = "Enter a wallet address";

/// Message shown for every upstream failure.
pub const LOOKUP_FAILED_MESSAGE: &str = "Lookup failed";

/// Wallet explorer errors
#[derive(Error, Debug)]
pub enum Error {
    /// Address field was empty at submission time
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream answered with a non-success status
    #[error("Upstream {url} returned status {status}")]
    Status {
        /// Request URL (without query string)
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Upstream body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an input error for an empty address
    #[must_use]
    pub fn empty_address() -> Self {
        Self::Input(EMPTY_ADDRESS_MESSAGE.to_string())
    }

    /// Whether this error is an upstream failure (network, status or body shape).
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Json(_) | Self::Parse(_)
        )
    }

    /// The single message shown to the user.
    ///
    /// Network and parse failures collapse into one message; the balance and
    /// transaction calls are not distinguished.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(msg) => msg.clone(),
            e if e.is_lookup_failure() => LOOKUP_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
