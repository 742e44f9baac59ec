//! Chain data adapters
//!
//! One adapter per chain profile. Each issues the upstream balance and
//! transaction calls and returns normalized data.

pub mod ethereum;
pub mod solana;

pub use ethereum::EthereumAdapter;
pub use solana::SolanaAdapter;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::classify::ChainProfile;
use crate::config::HttpConfig;
use crate::models::NormalizedTransaction;
use crate::{Error, Result};

/// Capability set shared by every chain profile.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Profile this adapter serves.
    fn profile(&self) -> ChainProfile;

    /// Balance in display units.
    async fn fetch_balance(&self, address: &str) -> Result<f64>;

    /// Up to `limit` most recent transactions, in upstream order.
    async fn fetch_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<NormalizedTransaction>>;
}

/// Build the HTTP client shared by both adapters.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?)
}

/// Send a GET and decode the JSON body.
///
/// Non-2xx statuses become [`Error::Status`]. Every reported URL, including the
/// one carried by a transport error, has its query stripped so credentials
/// never reach logs or error messages.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(redact)?;
    let status = response.status();
    if !status.is_success() {
        let mut url = response.url().clone();
        url.set_query(None);
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(redact)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Drop the query string from the URL a transport error reports.
fn redact(mut err: reqwest::Error) -> Error {
    if let Some(url) = err.url_mut() {
        url.set_query(None);
    }
    Error::Http(err)
}
