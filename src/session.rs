//! Lookup session
//!
//! Holds the state shown to the user between submissions. Every submission is
//! tagged with a sequence number and a completion is applied only if it is
//! newer than the last applied one, so a slow older lookup can never overwrite
//! the result of a newer one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::Result;
use crate::lookup::WalletLookup;
use crate::models::LookupResult;

/// What the user currently sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayState {
    /// Last successful result. A later failure does not clear it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<LookupResult>,
    /// Error message of the last applied submission, if it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the state last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            writeln!(f, "Error: {error}")?;
        }
        match &self.result {
            Some(result) => write!(f, "{result}"),
            None => Ok(()),
        }
    }
}

/// How a submission ended up affecting the display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The outcome replaced the display state
    Current,
    /// A newer submission had already been applied; the outcome was dropped
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    last_applied: u64,
    state: DisplayState,
}

/// Most-recent-result holder for one user.
pub struct LookupSession {
    lookup: Arc<WalletLookup>,
    next_sequence: AtomicU64,
    inner: Mutex<Inner>,
}

impl LookupSession {
    /// Create a session over a shared lookup service.
    pub fn new(lookup: Arc<WalletLookup>) -> Self {
        Self {
            lookup,
            next_sequence: AtomicU64::new(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Snapshot of the current display state
    #[must_use]
    pub fn state(&self) -> DisplayState {
        self.inner.lock().state.clone()
    }

    /// Submit an address and apply the outcome unless it is stale.
    pub async fn submit(&self, address: &str) -> Applied {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        self.begin();

        let outcome = self.lookup.lookup(address).await;
        self.apply(sequence, outcome)
    }

    /// A new trigger clears the previous error, never the previous result.
    fn begin(&self) {
        self.inner.lock().state.error = None;
    }

    fn apply(&self, sequence: u64, outcome: Result<LookupResult>) -> Applied {
        let mut inner = self.inner.lock();
        if sequence <= inner.last_applied {
            warn!(
                sequence,
                last_applied = inner.last_applied,
                "Discarding stale lookup result"
            );
            return Applied::Stale;
        }

        inner.last_applied = sequence;
        match outcome {
            Ok(result) => {
                inner.state.result = Some(result);
                inner.state.error = None;
            }
            Err(e) => {
                inner.state.error = Some(e.user_message());
            }
        }
        inner.state.updated_at = Some(Utc::now());
        debug!(sequence, "Applied lookup outcome");
        Applied::Current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::adapter::ChainAdapter;
    use crate::classify::ChainProfile;
    use crate::error::{EMPTY_ADDRESS_MESSAGE, LOOKUP_FAILED_MESSAGE};
    use crate::models::NormalizedTransaction;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Balance is the numeric part of the address. An address ending in
    /// `fail` produces an upstream error; one ending in `held` signals
    /// `started` and blocks until `release` is notified.
    struct StubAdapter {
        profile: ChainProfile,
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ChainAdapter for StubAdapter {
        fn profile(&self) -> ChainProfile {
            self.profile
        }

        async fn fetch_balance(&self, address: &str) -> Result<f64> {
            if address.ends_with("fail") {
                return Err(Error::Parse("bad body".to_string()));
            }
            if address.ends_with("held") {
                self.started.notify_one();
                self.release.notified().await;
                return Ok(0.0);
            }
            let units: u32 = address.trim_start_matches("0x").parse().unwrap_or(0);
            Ok(f64::from(units))
        }

        async fn fetch_recent_transactions(
            &self,
            address: &str,
            _limit: usize,
        ) -> Result<Vec<NormalizedTransaction>> {
            Ok(vec![NormalizedTransaction {
                identifier: address.to_string(),
                counterparty_from: "from".to_string(),
                counterparty_to: Some("to".to_string()),
            }])
        }
    }

    fn gated_session() -> (Arc<LookupSession>, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let adapter = |profile| {
            Arc::new(StubAdapter {
                profile,
                started: started.clone(),
                release: release.clone(),
            })
        };
        let lookup = WalletLookup::new(
            adapter(ChainProfile::Ethereum),
            adapter(ChainProfile::Solana),
            5,
        );
        (
            Arc::new(LookupSession::new(Arc::new(lookup))),
            started,
            release,
        )
    }

    fn session() -> Arc<LookupSession> {
        gated_session().0
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result_visible() {
        let session = session();
        assert_eq!(session.submit("0x1").await, Applied::Current);
        let first = session.state().result.unwrap();

        assert_eq!(session.submit("0xfail").await, Applied::Current);
        let state = session.state();
        assert_eq!(state.error.as_deref(), Some(LOOKUP_FAILED_MESSAGE));
        assert_eq!(state.result, Some(first));
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let session = session();
        session.submit("").await;
        assert_eq!(session.state().error.as_deref(), Some(EMPTY_ADDRESS_MESSAGE));
        assert!(session.state().result.is_none());

        session.submit("0x2").await;
        let state = session.state();
        assert!(state.error.is_none());
        assert_eq!(state.result.unwrap().balance, 2.0);
    }

    #[tokio::test]
    async fn test_slow_older_lookup_does_not_overwrite_newer() {
        let (session, started, release) = gated_session();

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("0xheld").await })
        };
        // The held lookup has taken its sequence number once its adapter runs
        started.notified().await;
        assert_eq!(session.submit("0x1").await, Applied::Current);

        release.notify_one();
        assert_eq!(slow.await.unwrap(), Applied::Stale);
        let state = session.state();
        assert_eq!(state.result.unwrap().address, "0x1");
    }

    #[test]
    fn test_display_state_shows_error_and_result() {
        let state = DisplayState {
            result: Some(LookupResult {
                address: "0xabc".to_string(),
                chain: ChainProfile::Ethereum,
                balance: 5.0,
                transactions: Vec::new(),
            }),
            error: Some(LOOKUP_FAILED_MESSAGE.to_string()),
            updated_at: None,
        };
        let text = state.to_string();
        assert!(text.starts_with("Error: Lookup failed"));
        assert!(text.contains("Balance: 5 ETH"));
    }
}
