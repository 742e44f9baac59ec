//! Address classification
//!
//! Picks the chain profile from the literal address string. Nothing here
//! validates syntax, checksum or length: malformed addresses are forwarded to
//! the upstream API, which reports its own error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of account-based (Ethereum) addresses.
pub const ACCOUNT_PREFIX: &str = "0x";

/// Supported chain profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainProfile {
    /// Account-based chain, queried through an Etherscan-compatible API
    Ethereum,
    /// Alternate chain, queried through a Solscan-compatible API
    Solana,
}

impl ChainProfile {
    /// Native currency symbol
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Ethereum => "ETH",
            Self::Solana => "SOL",
        }
    }

    /// Decimal places between the smallest unit and the display unit.
    #[must_use]
    pub fn decimals(self) -> i32 {
        match self {
            Self::Ethereum => 18,
            Self::Solana => 9,
        }
    }
}

impl fmt::Display for ChainProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "ethereum"),
            Self::Solana => write!(f, "solana"),
        }
    }
}

/// Select the chain profile for an address.
///
/// The prefix check is literal and case-sensitive.
#[must_use]
pub fn classify(address: &str) -> ChainProfile {
    if address.starts_with(ACCOUNT_PREFIX) {
        ChainProfile::Ethereum
    } else {
        ChainProfile::Solana
    }
}
