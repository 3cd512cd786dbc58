//! Entry points: coordinate -> address, and free-text search

use std::sync::Arc;

use nominatim_client::NominatimClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bounds::BoundingBox;
use crate::error::{GeocodingError, Result};
use crate::fanout::{collect_responses, FanoutConfig};
use crate::merge::{merge, GeocodeResult};
use crate::profile::CountryProfile;

/// One forward-search hit resolved on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCandidate {
    pub latitude: f64,
    pub longitude: f64,
    /// Extent of the matched place, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(flatten)]
    pub result: GeocodeResult,
}

/// Administrative geocoder for a single country.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent resolutions. Dropping a `resolve` future abandons its in-flight
/// provider calls without merging anything.
pub struct AdminGeocoder {
    client: NominatimClient,
    profile: Arc<CountryProfile>,
    fanout: FanoutConfig,
}

impl AdminGeocoder {
    pub fn new(client: NominatimClient, profile: Arc<CountryProfile>, fanout: FanoutConfig) -> Self {
        Self {
            client,
            profile,
            fanout,
        }
    }

    pub fn profile(&self) -> &CountryProfile {
        &self.profile
    }

    /// Resolve a range-checked coordinate into an administrative address.
    ///
    /// Fails with [`GeocodingError::OutOfBounds`] before any network call when
    /// the point is outside the country, and with
    /// [`GeocodingError::UpstreamUnavailable`] when no zoom level produced a
    /// usable response. A low-confidence result is still `Ok`.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Result<GeocodeResult> {
        if !self.profile.is_in_country(latitude, longitude) {
            return Err(GeocodingError::OutOfBounds(latitude, longitude));
        }

        let responses =
            collect_responses(&self.client, &self.profile, &self.fanout, latitude, longitude).await;
        let result = merge(&self.profile, &responses)?;

        info!(
            lat = latitude,
            lon = longitude,
            district = result.district.as_deref().unwrap_or("unknown"),
            sector = result.sector.as_deref().unwrap_or("unknown"),
            confidence = ?result.confidence,
            "Resolved coordinates"
        );

        Ok(result)
    }

    /// Forward search restricted to the country. Each hit is extracted and
    /// normalized on its own; hits outside the country are dropped.
    pub async fn resolve_address(&self, query: &str, limit: u32) -> Result<Vec<AddressCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let hits = self
            .client
            .search(query, self.profile.country_code(), limit)
            .await?;

        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            if !hit.country_code().is_some_and(|cc| self.profile.is_country_code(cc)) {
                continue;
            }
            let Some((latitude, longitude)) = hit.coordinates() else {
                continue;
            };
            if !self.profile.is_in_country(latitude, longitude) {
                continue;
            }
            let bounding_box = hit
                .bounding_box
                .as_deref()
                .and_then(BoundingBox::from_provider);
            let result = merge(&self.profile, std::slice::from_ref(&hit))?;
            candidates.push(AddressCandidate {
                latitude,
                longitude,
                bounding_box,
                result,
            });
        }

        debug!(query, candidates = candidates.len(), "Resolved address query");
        Ok(candidates)
    }
}
