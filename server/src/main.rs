//! `dcat-server`: serves the DCAT catalog of a dataset snapshot.
//!
//! Usage: `dcat-server --datasets <path> [--listen-addr <addr>] [--base-uri <uri>]`
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dcat_catalog::InMemoryRepository;
use dcat_server::{CatalogServer, CliArgs, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load(CliArgs::parse()).context("invalid configuration")?;

    let repository = InMemoryRepository::from_json_file(&config.datasets)
        .with_context(|| format!("failed to load datasets from {}", config.datasets.display()))?;
    tracing::info!(
        datasets = repository.len(),
        path = %config.datasets.display(),
        "loaded dataset snapshot"
    );

    let server = CatalogServer::start(&config, Arc::new(repository), shutdown_signal()).await?;
    tracing::info!("catalog available at {}/info/dcat", server.base_url);

    server.handle.await??;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl-C, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "unable to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
