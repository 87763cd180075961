//! Libris API server

use clap::Parser;
use libris_api::config::{Args, ServerConfig};
use libris_api::{build_router, seed, AppState};
use libris_core::logging_facility;
use libris_core::InMemoryStore;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from(Args::parse());
    logging_facility::init(config.log_profile);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server stopped");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    if config.seed {
        seed::load(&store)?;
    }
    let state = AppState::new(config.selector.clone(), store)?;

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(
        listen = %config.listen,
        default_version = %config.selector.default_version,
        "libris-api listening"
    );
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
