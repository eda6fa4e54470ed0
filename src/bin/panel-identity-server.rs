// ABOUTME: Server binary for the panel identity service
// ABOUTME: Loads configuration, bootstraps key material, and serves the HTTP API
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Panel Identity Server Binary
//!
//! Starts the identity service: configuration from the environment, RSA key
//! material generated or loaded at startup (fatal on failure), SQLite-backed
//! persistence, and the axum HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use panel_identity_service::{
    config::environment::ServerConfig,
    database_plugins::{DatabaseProvider, SqliteDatabase},
    key_management::KeyMaterial,
    logging,
    server::{self, ServerResources},
};
use std::sync::Arc;
use tracing::info;

/// Command-line arguments
#[derive(Parser)]
#[command(name = "panel-identity-server")]
#[command(about = "Panel identity service - JWT credential issuance and validation")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting panel identity service");
    info!("{}", config.summary());

    // Key material is fatal on failure: the process cannot issue or verify
    // credentials without it.
    let key_material = match &config.auth.private_key_path {
        Some(path) => {
            let pem = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read private key from {}", path.display()))?;
            info!("Loaded signing key pair from {}", path.display());
            KeyMaterial::from_private_key_pem(&pem)?
        }
        None => {
            info!(
                "Generating {}-bit signing key pair (set JWT_PRIVATE_KEY_PATH to persist one)",
                config.auth.rsa_key_bits
            );
            KeyMaterial::generate_with_key_size(config.auth.rsa_key_bits)?
        }
    };
    let key_material = Arc::new(key_material);
    info!("Key material initialized");

    // Initialize database and run migrations
    let database = SqliteDatabase::new(&config.database.url).await?;
    let user_count = database.get_user_count().await?;
    info!(
        "Database initialized successfully: {} ({} users)",
        config.database.url, user_count
    );

    let resources = Arc::new(ServerResources::new(
        config,
        key_material,
        Arc::new(database),
    )?);

    server::serve(resources).await
}
