//! Sequential multi-zoom reverse lookups against the provider

use std::time::Duration;

use nominatim_client::{NominatimClient, NominatimResponse};
use tracing::{debug, warn};

use crate::profile::CountryProfile;

/// Building, city/district, county/province
const DEFAULT_ZOOM_LEVELS: [u8; 3] = [18, 10, 8];
/// Nominatim's public usage policy allows one request per second
const DEFAULT_REQUEST_DELAY_MS: u64 = 1100;

#[derive(Debug, Clone)]
pub struct FanoutConfig {
    /// Queried in order; most precise first
    pub zoom_levels: Vec<u8>,
    /// Pause between consecutive lookups, not applied after the last one
    pub request_delay: Duration,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }
}

/// One zoom-level lookup. Any failure, or a response for another country,
/// yields `None` so the remaining levels still run.
pub async fn query_provider(
    client: &NominatimClient,
    profile: &CountryProfile,
    latitude: f64,
    longitude: f64,
    zoom: u8,
) -> Option<NominatimResponse> {
    let response = match client.reverse(latitude, longitude, zoom).await {
        Ok(response) => response,
        Err(e) => {
            warn!(lat = latitude, lon = longitude, zoom, error = %e, "Zoom level lookup failed");
            return None;
        }
    };

    match response.country_code() {
        Some(code) if profile.is_country_code(code) => Some(response),
        other => {
            debug!(
                lat = latitude,
                lon = longitude,
                zoom,
                country = other.unwrap_or("unknown"),
                "Discarding response outside target country"
            );
            None
        }
    }
}

/// Run every configured zoom level and keep the usable responses in order
pub async fn collect_responses(
    client: &NominatimClient,
    profile: &CountryProfile,
    config: &FanoutConfig,
    latitude: f64,
    longitude: f64,
) -> Vec<NominatimResponse> {
    let mut responses = Vec::with_capacity(config.zoom_levels.len());

    for (i, &zoom) in config.zoom_levels.iter().enumerate() {
        if let Some(response) = query_provider(client, profile, latitude, longitude, zoom).await {
            responses.push(response);
        }

        let is_last = i + 1 == config.zoom_levels.len();
        if !is_last && !config.request_delay.is_zero() {
            tokio::time::sleep(config.request_delay).await;
        }
    }

    debug!(
        lat = latitude,
        lon = longitude,
        usable = responses.len(),
        requested = config.zoom_levels.len(),
        "Collected zoom level responses"
    );

    responses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FanoutConfig::default();
        assert_eq!(config.zoom_levels, vec![18, 10, 8]);
        assert_eq!(config.request_delay, Duration::from_millis(1100));
    }

    #[test]
    fn test_default_zoom_levels_descend() {
        let config = FanoutConfig::default();
        assert!(config.zoom_levels.windows(2).all(|w| w[0] > w[1]));
    }
}
