//! HTTP server for geocoding endpoints

use admin_geocoding::{AdminGeocoder, GeocodingError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

const MAX_SEARCH_LIMIT: u32 = 20;

/// Shared state for the HTTP server
pub struct ServerState {
    pub geocoder: AdminGeocoder,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(geocoder: AdminGeocoder) -> Self {
        Self {
            geocoder,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    country: String,
}

/// Reverse geocoding query parameters
#[derive(Deserialize)]
pub struct ReverseQuery {
    lat: f64,
    lon: f64,
}

/// Search query parameters
#[derive(Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    5
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Hard failures map to 4xx/5xx; low-confidence results are still 200
fn geocoding_error_response(e: &GeocodingError) -> Response {
    match e {
        GeocodingError::OutOfBounds(_, _) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        GeocodingError::UpstreamUnavailable | GeocodingError::Provider(_) => {
            tracing::error!(error = %e, "Geocoding upstream failed");
            error_response(StatusCode::BAD_GATEWAY, "Geocoding provider unavailable")
        }
        GeocodingError::Profile(_) => {
            tracing::error!(error = %e, "Geocoding failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Geocoding failed")
        }
    }
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reverse", get(reverse))
        .route("/search", get(search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        country: state.geocoder.profile().country_name().to_string(),
    })
}

/// Resolve coordinates into an administrative address
async fn reverse(
    State(state): State<SharedState>,
    Query(params): Query<ReverseQuery>,
) -> Response {
    if !(-90.0..=90.0).contains(&params.lat) || !(-180.0..=180.0).contains(&params.lon) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "lat must be within -90..90 and lon within -180..180",
        );
    }

    match state.geocoder.resolve(params.lat, params.lon).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => geocoding_error_response(&e),
    }
}

/// Forward search within the country
async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    if params.q.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "q must not be empty");
    }

    let limit = params.limit.clamp(1, MAX_SEARCH_LIMIT);
    match state.geocoder.resolve_address(&params.q, limit).await {
        Ok(candidates) => Json(candidates).into_response(),
        Err(e) => geocoding_error_response(&e),
    }
}
