//! In-process stub of the Etherscan and Solscan APIs

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use wallet_explorer::WalletLookup;
use wallet_explorer::config::{Config, EtherscanConfig, SolscanConfig};

pub const API_KEY: &str = "test-key";

/// Canned response for one endpoint
#[derive(Clone, Debug)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: json!({"error": "upstream unavailable"}).to_string(),
        }
    }

    pub fn raw(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }
}

/// Recorded request
#[derive(Clone, Debug)]
pub struct Seen {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Upstream behavior plus a log of everything it received
pub struct Upstream {
    pub eth_balance: Mutex<Canned>,
    pub eth_txlist: Mutex<Canned>,
    pub sol_account: Mutex<Canned>,
    pub sol_transactions: Mutex<Canned>,
    pub seen: Mutex<Vec<Seen>>,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            eth_balance: Mutex::new(Canned::json(json!({"status": "1", "message": "OK", "result": "0"}))),
            eth_txlist: Mutex::new(Canned::json(json!({"status": "1", "message": "OK", "result": []}))),
            sol_account: Mutex::new(Canned::json(json!({"lamports": 0}))),
            sol_transactions: Mutex::new(Canned::json(json!([]))),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Upstream {
    pub fn request_count(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn requests_to(&self, path_prefix: &str) -> Vec<Seen> {
        self.seen
            .lock()
            .iter()
            .filter(|s| s.path.starts_with(path_prefix))
            .cloned()
            .collect()
    }

    fn record(&self, path: String, query: HashMap<String, String>) {
        self.seen.lock().push(Seen { path, query });
    }
}

fn respond(canned: &Canned) -> Response {
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body.clone(),
    )
        .into_response()
}

async fn etherscan(
    State(upstream): State<Arc<Upstream>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let action = query.get("action").cloned().unwrap_or_default();
    upstream.record("/etherscan/api".to_string(), query);
    match action.as_str() {
        "balance" => respond(&upstream.eth_balance.lock()),
        "txlist" => respond(&upstream.eth_txlist.lock()),
        _ => respond(&Canned::status(StatusCode::BAD_REQUEST)),
    }
}

async fn solscan_account(
    State(upstream): State<Arc<Upstream>>,
    Path(address): Path<String>,
) -> Response {
    upstream.record(format!("/solscan/account/{address}"), HashMap::new());
    respond(&upstream.sol_account.lock())
}

async fn solscan_transactions(
    State(upstream): State<Arc<Upstream>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    upstream.record("/solscan/account/transactions".to_string(), query);
    respond(&upstream.sol_transactions.lock())
}

/// Start the stub on an ephemeral port
pub async fn spawn_upstream(upstream: Arc<Upstream>) -> SocketAddr {
    let app = Router::new()
        .route("/etherscan/api", get(etherscan))
        .route("/solscan/account/transactions", get(solscan_transactions))
        .route("/solscan/account/{address}", get(solscan_account))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Configuration pointing both adapters at the stub
pub fn config_for(addr: SocketAddr) -> Config {
    Config {
        etherscan: EtherscanConfig {
            base_url: format!("http://{addr}/etherscan/api"),
            api_key: API_KEY.to_string(),
        },
        solscan: SolscanConfig {
            base_url: format!("http://{addr}/solscan"),
        },
        ..Default::default()
    }
}

/// Stub upstream plus a lookup wired to it
pub async fn setup() -> (Arc<Upstream>, WalletLookup) {
    let upstream = Arc::new(Upstream::default());
    let addr = spawn_upstream(upstream.clone()).await;
    let lookup = WalletLookup::from_config(&config_for(addr)).unwrap();
    (upstream, lookup)
}

/// `count` Etherscan txlist records, newest first
pub fn eth_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "blockNumber": (1000 - i).to_string(),
                "hash": format!("0xhash{i}"),
                "from": format!("0xfrom{i}"),
                "to": format!("0xto{i}"),
                "value": "0",
                "isError": "0"
            })
        })
        .collect()
}
