// ABOUTME: Main server binary for the Larder recipe management API
// ABOUTME: Loads configuration, opens the database, and serves the HTTP router
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Larder Project

use anyhow::{Context, Result};
use clap::Parser;
use larder::config::environment::ServerConfig;
use larder::database::Database;
use larder::logging::LoggingConfig;
use larder::resources::ServerResources;
use larder::routes;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "larder-server", about = "Larder recipe management API server")]
struct Args {
    /// Override the HTTP listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::from_env().init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        "Starting larder-server"
    );

    let database = Database::new(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {e}"))?;

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));
    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    tracing::info!("Listening on http://0.0.0.0:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
