//! Wallet Explorer - balance and latest transactions for ETH and SOL addresses

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use wallet_explorer::{
    WalletLookup, classify,
    cli::{Cli, Command, OutputFormat},
    config::Config,
    session::LookupSession,
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    match &cli.command {
        Some(Command::Classify { address }) => {
            println!("{}", classify(address));
            ExitCode::SUCCESS
        }
        Some(Command::Lookup { address, format }) => match build_lookup(&cli) {
            Ok(lookup) => run_lookup(&lookup, address, *format).await,
            Err(code) => code,
        },
        Some(Command::Interactive) | None => match build_lookup(&cli) {
            Ok(lookup) => run_interactive(lookup).await,
            Err(code) => code,
        },
    }
}

/// Load configuration and build the lookup service
fn build_lookup(cli: &Cli) -> Result<WalletLookup, ExitCode> {
    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {e}");
        eprintln!("❌ {e}");
        ExitCode::FAILURE
    })?;

    let lookup = WalletLookup::from_config(&config).map_err(|e| {
        error!("Invalid configuration: {e}");
        eprintln!("❌ {e}");
        ExitCode::FAILURE
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        etherscan = %config.etherscan.base_url,
        solscan = %config.solscan.base_url,
        page_size = lookup.page_size(),
        "Wallet explorer ready"
    );
    Ok(lookup)
}

/// Run a single lookup
async fn run_lookup(lookup: &WalletLookup, address: &str, format: OutputFormat) -> ExitCode {
    match lookup.lookup(address).await {
        Ok(result) => {
            match format {
                OutputFormat::Text => println!("{result}"),
                OutputFormat::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("❌ Failed to serialize to JSON: {e}");
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Read addresses from stdin and show the session state after each one
async fn run_interactive(lookup: WalletLookup) -> ExitCode {
    let session = LookupSession::new(Arc::new(lookup));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Enter an ETH or SOL wallet address (Ctrl-D to quit):");
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        };

        session.submit(&line).await;
        println!("{}\n", session.state());
    }

    ExitCode::SUCCESS
}
