//! Combine per-response extractions into one address record.

use nominatim_client::NominatimResponse;
use serde::{Deserialize, Serialize};

use crate::error::{GeocodingError, Result};
use crate::extract::{
    extract_cell, extract_district, extract_road, extract_sector, extract_village, Confidence,
    FieldCandidate, TaggedValue,
};
use crate::profile::CountryProfile;

pub const DERIVED_SOURCE: &str = "derived";

/// Provenance of each populated field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
}

/// Resolved administrative address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    /// Composed display address, always ending with the country name
    pub address_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    pub confidence: Confidence,
    pub sources: FieldSources,
}

impl GeocodeResult {
    /// Usable data existed but neither district nor sector cleared the bar.
    /// Callers should flag these rather than present them as authoritative.
    pub fn is_partial(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

/// Running best candidate for one graded field.
///
/// States are ordered `empty < Low < Medium < High`. An empty slot takes any
/// candidate that carries a value. A filled slot is replaced only by a
/// candidate at or above `threshold` that is strictly better than the current
/// pick, so the first pick at the top grade is never displaced.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    threshold: Confidence,
    best: Option<FieldCandidate>,
}

impl FieldSlot {
    pub fn new(threshold: Confidence) -> Self {
        Self {
            threshold,
            best: None,
        }
    }

    /// District: only a high-confidence candidate replaces an existing pick
    pub fn district() -> Self {
        Self::new(Confidence::High)
    }

    /// Sector: medium-confidence candidates may replace too.
    ///
    /// An equal grade never replaces, so a later, coarser zoom level cannot
    /// overwrite the sector picked from an earlier, more precise one.
    pub fn sector() -> Self {
        Self::new(Confidence::Medium)
    }

    /// Offer a candidate; returns whether it was taken
    pub fn offer(&mut self, candidate: FieldCandidate) -> bool {
        if candidate.value.is_none() {
            return false;
        }
        let take = match &self.best {
            None => true,
            Some(current) => {
                candidate.confidence >= self.threshold && candidate.confidence > current.confidence
            }
        };
        if take {
            self.best = Some(candidate);
        }
        take
    }

    pub fn value(&self) -> Option<&str> {
        self.best.as_ref().and_then(|c| c.value.as_deref())
    }

    pub fn source(&self) -> Option<&str> {
        self.best.as_ref().and_then(|c| c.source.as_deref())
    }

    /// Grade of the current pick; an empty slot counts as low
    pub fn confidence(&self) -> Confidence {
        self.best
            .as_ref()
            .map(|c| c.confidence)
            .unwrap_or(Confidence::Low)
    }
}

/// High only when both fields reached at least medium and the district is high
pub fn overall_confidence(district: Confidence, sector: Confidence) -> Confidence {
    if district == Confidence::High && sector != Confidence::Low {
        Confidence::High
    } else if district != Confidence::Low || sector != Confidence::Low {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Merge responses given most precise first. Fails with
/// [`GeocodingError::UpstreamUnavailable`] when there is nothing to merge.
pub fn merge(profile: &CountryProfile, responses: &[NominatimResponse]) -> Result<GeocodeResult> {
    if responses.is_empty() {
        return Err(GeocodingError::UpstreamUnavailable);
    }

    let mut district = FieldSlot::district();
    let mut sector = FieldSlot::sector();
    let mut road: Option<TaggedValue> = None;
    let mut cell: Option<TaggedValue> = None;
    let mut village: Option<TaggedValue> = None;

    for response in responses {
        district.offer(extract_district(profile, response));
        sector.offer(extract_sector(profile, response, district.value()));

        if road.is_none() {
            road = extract_road(response);
        }
        if cell.is_none() {
            cell = extract_cell(profile, response);
        }
        if village.is_none() {
            village = extract_village(profile, response);
        }
    }

    let province = district
        .value()
        .and_then(|d| profile.province_for(d))
        .map(str::to_string);

    let address_text = compose_address(
        profile,
        road.as_ref().map(|r| r.value.as_str()),
        sector.value(),
        district.value(),
        province.as_deref(),
    );

    let sources = FieldSources {
        province: province.as_ref().map(|_| DERIVED_SOURCE.to_string()),
        district: district.source().map(str::to_string),
        sector: sector.source().map(str::to_string),
        cell: cell.as_ref().map(|c| c.source.clone()),
        village: village.as_ref().map(|v| v.source.clone()),
        road: road.as_ref().map(|r| r.source.clone()),
    };

    Ok(GeocodeResult {
        address_text,
        province,
        district: district.value().map(str::to_string),
        sector: sector.value().map(str::to_string),
        cell: cell.map(|c| c.value),
        village: village.map(|v| v.value),
        road: road.map(|r| r.value),
        confidence: overall_confidence(district.confidence(), sector.confidence()),
        sources,
    })
}

/// "road, sector, <district> District, province, country", skipping absent parts
fn compose_address(
    profile: &CountryProfile,
    road: Option<&str>,
    sector: Option<&str>,
    district: Option<&str>,
    province: Option<&str>,
) -> String {
    let district = district.map(|d| format!("{d} District"));
    [road, sector, district.as_deref(), province, Some(profile.country_name())]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}
