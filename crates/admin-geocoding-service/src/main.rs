//! Administrative geocoding service
//!
//! Resolves coordinates into province/district/sector addresses over HTTP,
//! backed by Nominatim.

mod config;
mod error;
mod server;

use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::server::{start_server, ServerState, SharedState};
use admin_geocoding::AdminGeocoder;
use nominatim_client::NominatimClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("admin_geocoding_service=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting administrative geocoding service...");

    // Load configuration from environment
    let config = Config::from_env();
    info!("Port: {}", config.port);
    info!("Nominatim: {}", config.nominatim_url);
    info!("Zoom levels: {:?}", config.zoom_levels);

    let profile = config.load_profile()?;
    info!("Country: {} ({})", profile.country_name(), profile.country_code());

    let client = NominatimClient::new(config.nominatim_config())?;
    let geocoder = AdminGeocoder::new(client, profile, config.fanout_config());

    // Create shared state
    let state: SharedState = Arc::new(ServerState::new(geocoder));

    // Start HTTP server (blocking)
    start_server(state, config.port)
        .await
        .map_err(|e| ServiceError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
