//! Etherscan-compatible adapter

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ChainAdapter, get_json};
use crate::classify::ChainProfile;
use crate::models::{EtherscanTransaction, NormalizedTransaction, RawTransaction, to_display_units};
use crate::{Error, Result};

/// Etherscan wraps every payload in `{status, message, result}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    message: Option<String>,
    result: Value,
}

impl Envelope {
    fn describe(&self) -> String {
        match (&self.message, &self.result) {
            (Some(msg), Value::String(detail)) => format!("{msg}: {detail}"),
            (Some(msg), _) => msg.clone(),
            (None, other) => other.to_string(),
        }
    }
}

/// Adapter for addresses starting with `0x`.
pub struct EthereumAdapter {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl EthereumAdapter {
    /// Create a new adapter against `base_url` (e.g. `https://api.etherscan.io/api`).
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("etherscan.base_url {base_url:?}: {e}")))?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, params: &[(&str, &str)]) -> RequestBuilder {
        self.client
            .get(self.base_url.clone())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
    }
}

/// Parse the wei integer string Etherscan returns as a balance.
fn parse_wei(envelope: &Envelope) -> Result<u128> {
    match &envelope.result {
        Value::String(s) => s.trim().parse::<u128>().map_err(|_| {
            Error::Parse(format!("balance is not an integer: {}", envelope.describe()))
        }),
        _ => Err(Error::Parse(format!(
            "unexpected balance result: {}",
            envelope.describe()
        ))),
    }
}

/// Normalize the first `limit` entries of a `txlist` result.
fn normalize_txlist(envelope: Envelope, limit: usize) -> Result<Vec<NormalizedTransaction>> {
    let records = match envelope.result {
        Value::Array(records) => records,
        _ => {
            return Err(Error::Parse(format!(
                "txlist result is not a list: {}",
                envelope.describe()
            )));
        }
    };

    records
        .into_iter()
        .take(limit)
        .map(|record| {
            let tx: EtherscanTransaction = serde_json::from_value(record)?;
            RawTransaction::Ethereum(tx).normalize()
        })
        .collect()
}

#[async_trait]
impl ChainAdapter for EthereumAdapter {
    fn profile(&self) -> ChainProfile {
        ChainProfile::Ethereum
    }

    async fn fetch_balance(&self, address: &str) -> Result<f64> {
        debug!(chain = %self.profile(), address, "Requesting balance");
        let envelope: Envelope = get_json(self.request(&[
            ("module", "account"),
            ("action", "balance"),
            ("address", address),
            ("tag", "latest"),
        ]))
        .await?;

        let wei = parse_wei(&envelope)?;
        Ok(to_display_units(wei, ChainProfile::Ethereum))
    }

    async fn fetch_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<NormalizedTransaction>> {
        debug!(chain = %self.profile(), address, limit, "Requesting txlist");
        // Upstream has no page size here; the full list is truncated locally
        let envelope: Envelope = get_json(self.request(&[
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("sort", "desc"),
        ]))
        .await?;

        normalize_txlist(envelope, limit)
    }
}
