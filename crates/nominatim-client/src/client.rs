use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::NominatimError;
use crate::types::NominatimResponse;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "nominatim-client-rs/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Public instance usage policy: at most one request per second
const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

/// Connection settings for [`NominatimClient`]
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent on every request; anonymous traffic is blocked by the public instance
    pub user_agent: String,
    /// Per-request timeout, covering connect and body
    pub timeout: Duration,
    /// Maximum requests in flight against the host at once
    pub max_concurrent: usize,
    /// Minimum gap between the starts of consecutive requests, across all callers
    pub min_interval: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent: 1,
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
        }
    }
}

/// Nominatim geocoding client with a per-host concurrency limit.
///
/// Every caller sharing one client shares its limits: at most
/// `max_concurrent` requests in flight, and request starts spaced by at least
/// `min_interval` even when they come from unrelated resolutions. The
/// `timeout` applies to the HTTP exchange only, not to time spent waiting
/// for a permit or for the spacing.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    /// Bounds in-flight requests against the upstream host
    rate_limiter: Semaphore,
    min_interval: Duration,
    /// Start of the most recent request
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// Create a new client from explicit settings
    pub fn new(config: NominatimConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: Semaphore::new(config.max_concurrent.max(1)),
            min_interval: config.min_interval,
            last_request: Mutex::new(None),
        })
    }

    /// Create a new client with a custom Nominatim URL and default settings otherwise
    pub fn with_base_url(base_url: &str) -> crate::Result<Self> {
        Self::new(NominatimConfig {
            base_url: base_url.to_string(),
            ..NominatimConfig::default()
        })
    }

    /// Reverse geocode coordinates at the given zoom (3 = country .. 18 = building)
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        zoom: u8,
    ) -> crate::Result<NominatimResponse> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(NominatimError::InvalidCoordinates(latitude, longitude));
        }

        let url = format!(
            "{}/reverse?lat={}&lon={}&zoom={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude, zoom
        );

        let data: NominatimResponse = self.get_json(&url).await?;

        if let Some(ref err) = data.error {
            warn!(lat = latitude, lon = longitude, zoom, error = %err, "Nominatim returned error");
            return Err(NominatimError::NoResult(err.clone()));
        }

        debug!(
            lat = latitude,
            lon = longitude,
            zoom,
            country = data.country_code().unwrap_or("unknown"),
            "Reverse geocoded coordinates"
        );

        Ok(data)
    }

    /// Free-text search restricted to a comma-separated list of country codes
    pub async fn search(
        &self,
        query: &str,
        country_codes: &str,
        limit: u32,
    ) -> crate::Result<Vec<NominatimResponse>> {
        let url = format!(
            "{}/search?q={}&countrycodes={}&format=json&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(country_codes),
            limit
        );

        let results: Vec<NominatimResponse> = self.get_json(&url).await?;
        debug!(query, hits = results.len(), "Searched Nominatim");
        Ok(results)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> crate::Result<T> {
        let _permit = self
            .rate_limiter
            .acquire()
            .await
            .map_err(|_| NominatimError::LimiterClosed)?;

        self.wait_for_slot().await;

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NominatimError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Sleep until `min_interval` has passed since the previous request started
    async fn wait_for_slot(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent, 1);
        assert_eq!(config.min_interval, Duration::from_secs(1));
        assert!(!config.user_agent.is_empty());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = NominatimClient::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_reverse_rejects_out_of_range() {
        let client = NominatimClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.reverse(95.0, 30.0, 18).await.unwrap_err();
        assert!(matches!(err, NominatimError::InvalidCoordinates(_, _)));
    }
}
