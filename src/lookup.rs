//! Wallet lookup
//!
//! Classifies an address, runs the balance and transaction calls of the
//! matching adapter concurrently, and assembles one [`LookupResult`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::{ChainAdapter, EthereumAdapter, SolanaAdapter, build_client};
use crate::classify::{ChainProfile, classify};
use crate::config::{Config, MAX_PAGE_SIZE};
use crate::models::LookupResult;
use crate::{Error, Result};

/// Routes lookups to the adapter for each chain profile.
pub struct WalletLookup {
    ethereum: Arc<dyn ChainAdapter>,
    solana: Arc<dyn ChainAdapter>,
    page_size: usize,
}

impl WalletLookup {
    /// Create a lookup over explicit adapters.
    ///
    /// `page_size` is clamped to `1..=5`.
    pub fn new(
        ethereum: Arc<dyn ChainAdapter>,
        solana: Arc<dyn ChainAdapter>,
        page_size: usize,
    ) -> Self {
        Self {
            ethereum,
            solana,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Build both HTTP adapters from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration fails validation, in
    /// particular when no Etherscan API key was supplied.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config.http)?;
        let ethereum = EthereumAdapter::new(
            client.clone(),
            &config.etherscan.base_url,
            config.etherscan.api_key.clone(),
        )?;
        let solana = SolanaAdapter::new(client, &config.solscan.base_url)?;
        Ok(Self::new(
            Arc::new(ethereum),
            Arc::new(solana),
            config.lookup.page_size,
        ))
    }

    /// Number of transactions returned per lookup
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn adapter(&self, profile: ChainProfile) -> &Arc<dyn ChainAdapter> {
        match profile {
            ChainProfile::Ethereum => &self.ethereum,
            ChainProfile::Solana => &self.solana,
        }
    }

    /// Look up balance and recent transactions for `address`.
    ///
    /// An empty (or whitespace-only) address fails with [`Error::Input`]
    /// before any request is sent. Otherwise the address is forwarded
    /// verbatim. Either upstream call failing fails the whole lookup.
    pub async fn lookup(&self, address: &str) -> Result<LookupResult> {
        if address.trim().is_empty() {
            return Err(Error::empty_address());
        }

        let chain = classify(address);
        let adapter = self.adapter(chain);

        let outcome = tokio::try_join!(
            adapter.fetch_balance(address),
            adapter.fetch_recent_transactions(address, self.page_size),
        );

        match outcome {
            Ok((balance, mut transactions)) => {
                transactions.truncate(self.page_size);
                info!(
                    %chain,
                    address,
                    balance,
                    count = transactions.len(),
                    "Lookup complete"
                );
                Ok(LookupResult {
                    address: address.to_string(),
                    chain,
                    balance,
                    transactions,
                })
            }
            Err(e) => {
                warn!(%chain, address, error = %e, "Lookup failed");
                Err(e)
            }
        }
    }
}
