// ABOUTME: CoachTrack server binary - loads config, connects storage, serves HTTP
// ABOUTME: Single-process server; all state lives in the shared SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use coachtrack::config::ServerConfig;
use coachtrack::database::Database;
use coachtrack::server::{serve, ServerResources};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coachtrack-server", about = "CoachTrack coaching-program backend")]
struct Args {
    /// Override the HTTP port from the environment
    #[arg(long)]
    port: Option<u16>,

    /// Override the database URL from the environment
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!("Starting CoachTrack server on port {}", config.http_port);
    let database = Database::new(&config.database_url).await?;
    let resources = Arc::new(ServerResources::new(database, config));

    serve(resources).await?;
    Ok(())
}
