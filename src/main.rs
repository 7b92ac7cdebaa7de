// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use std::env;
use termscan::{
    api::{start_server, AppState, ServerConfig},
    scan::{PoolConfig, Scanner},
    version,
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {}", version::get_version_string());

    let server_config = ServerConfig::from_env()?;
    let pool_config = PoolConfig::from_env()?;
    tracing::info!(
        "Scan pool: concurrency {}, request timeout {:?}, collection deadline {:?}",
        pool_config.concurrency,
        pool_config.per_request_timeout,
        pool_config.collection_deadline
    );

    let default_targets = server_config.load_default_targets()?;
    let scanner = Scanner::new(pool_config)?;
    let state = AppState::new(scanner, default_targets);

    start_server(&server_config, state, async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down...");
    })
    .await?;

    Ok(())
}
