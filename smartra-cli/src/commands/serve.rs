//! HTTP server command
//!
//! Resolves settings from the config file, environment, and flags (in
//! increasing priority), then runs the server until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use smartra_core::{DatabaseSection, SmartraConfig};
use smartra_server::db::{create_pool, migrations};
use smartra_server::{run_server, ServerConfig, UploadStore};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory for uploaded attachments (overrides config)
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Do not create tables on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Merge flags over the loaded config.
fn resolve(
    args: &ServeArgs,
    config: &SmartraConfig,
) -> Result<(ServerConfig, DatabaseSection, PathBuf)> {
    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address in config: {}", config.server.bind))?,
    };

    let server = ServerConfig {
        bind_addr,
        cors_origins: config.server.cors_origins.clone(),
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        max_body_bytes: config.uploads.max_bytes,
    };

    let database = match &args.database_url {
        Some(url) => config.database.with_url(url.as_str()),
        None => config.database.clone(),
    };

    let upload_dir = args
        .upload_dir
        .clone()
        .unwrap_or_else(|| config.uploads.dir.clone());

    Ok((server, database, upload_dir))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = SmartraConfig::load().context("Failed to load config")?;
    let (server, database, upload_dir) = resolve(&args, &config)?;

    tracing::info!("Starting smartra server on {}", server.bind_addr);

    let pool = create_pool(&database)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::info!("Skipping schema migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    run_server(pool, UploadStore::new(upload_dir), server)
        .await
        .context("Server error")?;

    Ok(())
}
