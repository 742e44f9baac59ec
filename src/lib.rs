//! Wallet Explorer Library
//!
//! Look up the balance and latest transactions of a wallet address on either
//! of two chains, chosen from the address itself.
//!
//! # Flow
//!
//! - **Classify**: `0x`-prefixed addresses go to an Etherscan-compatible API,
//!   everything else to a Solscan-compatible API
//! - **Fetch**: balance and transaction calls run concurrently
//! - **Normalize**: both response schemas become one [`models::LookupResult`]
//! - **Display**: a [`session::LookupSession`] keeps the latest outcome

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod session;

pub use classify::{ChainProfile, classify};
pub use error::{Error, Result};
pub use lookup::WalletLookup;
pub use models::{LookupResult, NormalizedTransaction};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
///
/// Logs go to stderr so lookup output on stdout stays clean.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| Error::Config(e.to_string()))?;
        }
        _ => {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| Error::Config(e.to_string()))?;
        }
    }

    Ok(())
}
