//! Solscan-compatible adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{ChainAdapter, get_json};
use crate::classify::ChainProfile;
use crate::models::{NormalizedTransaction, RawTransaction, SolscanTransaction, to_display_units};
use crate::{Error, Result};

/// `GET /account/<addr>` body; only the balance is read.
#[derive(Debug, Deserialize)]
struct AccountInfo {
    lamports: u64,
}

/// Adapter for every address that is not `0x`-prefixed.
pub struct SolanaAdapter {
    client: Client,
    base_url: Url,
}

impl SolanaAdapter {
    /// Create a new adapter against `base_url` (e.g. `https://public-api.solscan.io`).
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("solscan.base_url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "solscan.base_url {base_url} cannot take a path"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Append path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl ChainAdapter for SolanaAdapter {
    fn profile(&self) -> ChainProfile {
        ChainProfile::Solana
    }

    async fn fetch_balance(&self, address: &str) -> Result<f64> {
        debug!(chain = %self.profile(), address, "Requesting account info");
        let url = self.endpoint(&["account", address]);
        let account: AccountInfo = get_json(self.client.get(url)).await?;
        Ok(to_display_units(u128::from(account.lamports), ChainProfile::Solana))
    }

    async fn fetch_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<NormalizedTransaction>> {
        debug!(chain = %self.profile(), address, limit, "Requesting transactions");
        let url = self.endpoint(&["account", "transactions"]);
        let limit = limit.to_string();
        let records: Vec<SolscanTransaction> = get_json(
            self.client
                .get(url)
                .query(&[("account", address), ("limit", limit.as_str())]),
        )
        .await?;

        records
            .into_iter()
            .map(|tx| RawTransaction::Solana(tx).normalize())
            .collect()
    }
}
