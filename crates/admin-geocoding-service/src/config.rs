use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use admin_geocoding::{CountryProfile, FanoutConfig};
use nominatim_client::NominatimConfig;

use crate::error::Result;

const DEFAULT_USER_AGENT: &str = "admin-geocoding-service/0.1 (https://github.com/admin-geocoding)";

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub nominatim_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_concurrent: usize,
    /// Spacing between any two provider requests, across all resolutions
    pub min_request_interval: Duration,
    pub request_delay: Duration,
    pub zoom_levels: Vec<u8>,
    /// JSON country profile; the builtin Rwanda profile when unset
    pub country_profile_path: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from any key lookup; unparseable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let nominatim = NominatimConfig::default();
        let fanout = FanoutConfig::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3005);

        let nominatim_url = lookup("NOMINATIM_URL").unwrap_or(nominatim.base_url);

        let user_agent =
            lookup("NOMINATIM_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let request_timeout = lookup("NOMINATIM_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(nominatim.timeout);

        let max_concurrent = lookup("NOMINATIM_MAX_CONCURRENT")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(nominatim.max_concurrent);

        let min_request_interval = lookup("NOMINATIM_MIN_INTERVAL_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(nominatim.min_interval);

        let request_delay = lookup("GEOCODER_REQUEST_DELAY_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(fanout.request_delay);

        let zoom_levels = lookup("GEOCODER_ZOOM_LEVELS")
            .and_then(|s| {
                s.split(',')
                    .map(|z| z.trim().parse::<u8>().ok())
                    .collect::<Option<Vec<_>>>()
            })
            .filter(|levels| !levels.is_empty())
            .unwrap_or(fanout.zoom_levels);

        let country_profile_path = lookup("COUNTRY_PROFILE_PATH").map(PathBuf::from);

        Self {
            port,
            nominatim_url,
            user_agent,
            request_timeout,
            max_concurrent,
            min_request_interval,
            request_delay,
            zoom_levels,
            country_profile_path,
        }
    }

    pub fn nominatim_config(&self) -> NominatimConfig {
        NominatimConfig {
            base_url: self.nominatim_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout,
            max_concurrent: self.max_concurrent,
            min_interval: self.min_request_interval,
        }
    }

    pub fn fanout_config(&self) -> FanoutConfig {
        FanoutConfig {
            zoom_levels: self.zoom_levels.clone(),
            request_delay: self.request_delay,
        }
    }

    pub fn load_profile(&self) -> Result<Arc<CountryProfile>> {
        match &self.country_profile_path {
            Some(path) => Ok(Arc::new(CountryProfile::from_json_file(path)?)),
            None => Ok(CountryProfile::rwanda()),
        }
    }
}
