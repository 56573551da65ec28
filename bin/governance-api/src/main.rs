use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use governance_cache::{
    ChainRegistry, JsonFileStore, KeyValueStore, ProposalIndexer, VoteAggregator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{ApiServer, AppState};
use crate::config::GovernanceConfig;

mod api;
mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting governance API");

    let config = GovernanceConfig::load(cli.config.as_deref()).await?;
    tracing::info!(
        hub_chain_id = config.hub.chain_id,
        hub_address = %config.hub.address,
        spokes = config.spokes.chain_ids.len(),
        networks = config.networks.len(),
        "Configuration loaded"
    );

    let registry = Arc::new(
        ChainRegistry::connect_all(&config.networks, config.rpc_timeout())
            .wrap_err("Failed to set up chain providers")?,
    );
    tracing::info!(chains = ?registry.chain_ids(), "Chain providers ready");

    let store: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&config.cache.path).wrap_err("Failed to open cache file")?,
    );

    let indexer = ProposalIndexer::new(config.indexer_config(), registry.clone(), store.clone())
        .wrap_err("Failed to create proposal indexer")?;
    let votes = VoteAggregator::new(&config.vote_config(), registry, store)
        .wrap_err("Failed to create vote aggregator")?;

    let state = AppState {
        indexer: Arc::new(indexer),
        votes: Arc::new(votes),
    };

    let server = ApiServer::new(state, config.listen_address());
    let cancel_token = server.cancel_token();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_token.cancel();
    });

    server.start().await?;

    tracing::info!("Governance API stopped");
    Ok(())
}
