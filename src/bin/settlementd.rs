//! settlementd: serves the settlement operations over HTTP.
//!
//! Backed by an in-memory ledger; intended for local development and
//! integration testing of partner clients.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use partner_settlement::dispatch::{self, Service};
use partner_settlement::{logging, InMemoryLedger, SettlementConfig, SettlementStore};

/// Partner settlement service
#[derive(Parser, Debug)]
#[command(name = "settlementd", version, about = "Partner settlement service")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "settlement.toml")]
    config: PathBuf,

    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        SettlementConfig::default().save(&args.config)?;
        println!("wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = SettlementConfig::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    logging::init(&config.logging)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        key_layout = ?config.ledger.key_layout,
        strategy = ?config.merge.strategy,
        "starting settlementd"
    );

    let store = SettlementStore::from_config(InMemoryLedger::new(), &config);
    let service = Arc::new(Service::settlement(store)?);

    tokio::select! {
        result = dispatch::serve(service, &config.server.bind) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("received shutdown signal"),
    }

    tracing::info!("settlementd exited cleanly");
    Ok(())
}
