//! HTTP boundary: `POST /analyze` runs an experiment on an uploaded CSV.
//!
//! Authentication is expected from whatever sits in front of this server.
pub mod api;
pub mod error;
pub mod handlers;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use abacus_classifiers::config::ModelConfig;
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

pub use api::create_router;

/// Server settings, built once at startup and shared with every handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Settings for every experiment the server runs.
    pub model: ModelConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
            model: ModelConfig::default(),
        }
    }
}

/// Load a server configuration from a JSON file.
pub fn load_server_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    let config: ServerConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
    Ok(config)
}

impl ServerConfig {
    pub fn from_arguments<P: AsRef<Path>>(config_path: Option<P>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_server_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = matches.get_one::<String>("host") {
            config.host = host.clone();
        }
        if let Some(port) = matches.get_one::<u16>("port") {
            config.port = *port;
        }

        config.model.validate()?;
        Ok(config)
    }
}

/// Shared handler state.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState { config }
    }
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on http://{}", addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
        }
        log::info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    log::info!("Server shut down cleanly");
    Ok(())
}
