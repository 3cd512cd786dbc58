//! Per-response field extraction. Each extractor reads one provider response
//! and yields its best guess for a single field.

use nominatim_client::NominatimResponse;
use serde::{Deserialize, Serialize};

use crate::profile::CountryProfile;

/// Most administrative first
const DISTRICT_ATTRIBUTES: [&str; 5] = ["county", "district", "city_district", "municipality", "city"];
/// Matches from the first N district attributes are graded high
const HIGH_CONFIDENCE_DISTRICT_TIERS: usize = 2;
const SECTOR_ATTRIBUTES: [&str; 4] = ["suburb", "neighbourhood", "town", "locality"];
const ROAD_ATTRIBUTES: [&str; 5] = ["road", "pedestrian", "path", "footway", "residential"];
const CELL_ATTRIBUTES: [&str; 2] = ["quarter", "city_block"];
const VILLAGE_ATTRIBUTES: [&str; 3] = ["village", "hamlet", "isolated_dwelling"];

pub const DISPLAY_NAME_SOURCE: &str = "display_name";

/// Trust label of an extraction method, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One extractor's answer for one field of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    pub value: Option<String>,
    pub confidence: Confidence,
    /// Raw attribute the value came from
    pub source: Option<String>,
}

impl FieldCandidate {
    pub fn new(value: impl Into<String>, confidence: Confidence, source: &str) -> Self {
        Self {
            value: Some(value.into()),
            confidence,
            source: Some(source.to_string()),
        }
    }

    /// No usable value
    pub fn empty() -> Self {
        Self {
            value: None,
            confidence: Confidence::Low,
            source: None,
        }
    }
}

/// Ungraded value with its provenance, for fields taken first-come
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedValue {
    pub value: String,
    pub source: String,
}

/// First known district among the county/district/city attributes
pub fn extract_district(profile: &CountryProfile, response: &NominatimResponse) -> FieldCandidate {
    for (rank, attribute) in DISTRICT_ATTRIBUTES.iter().enumerate() {
        let Some(raw) = response.attribute(attribute) else {
            continue;
        };
        let normalized = profile.normalizer().normalize_district(raw);
        if profile.is_district(&normalized) {
            let confidence = if rank < HIGH_CONFIDENCE_DISTRICT_TIERS {
                Confidence::High
            } else {
                Confidence::Medium
            };
            return FieldCandidate::new(normalized, confidence, attribute);
        }
    }

    FieldCandidate::empty()
}

/// Sector from the suburb-like attributes, falling back to the display name
/// trail. `district` is the district resolved so far, if any.
pub fn extract_sector(
    profile: &CountryProfile,
    response: &NominatimResponse,
    district: Option<&str>,
) -> FieldCandidate {
    let normalizer = profile.normalizer();

    for attribute in SECTOR_ATTRIBUTES {
        let Some(raw) = response.attribute(attribute) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        let normalized = normalizer.normalize_sector(raw);
        if is_plausible_sector(profile, raw, &normalized) {
            return FieldCandidate::new(normalized, Confidence::Medium, attribute);
        }
    }

    match sector_from_display_name(profile, response.display_name.as_deref(), district) {
        Some(sector) => FieldCandidate::new(sector, Confidence::Low, DISPLAY_NAME_SOURCE),
        None => FieldCandidate::empty(),
    }
}

/// First non-empty street attribute, trimmed but otherwise verbatim
pub fn extract_road(response: &NominatimResponse) -> Option<TaggedValue> {
    first_present(response, &ROAD_ATTRIBUTES).map(|(source, value)| TaggedValue {
        value: value.to_string(),
        source: source.to_string(),
    })
}

pub fn extract_cell(profile: &CountryProfile, response: &NominatimResponse) -> Option<TaggedValue> {
    first_normalized(profile, response, &CELL_ATTRIBUTES)
}

pub fn extract_village(
    profile: &CountryProfile,
    response: &NominatimResponse,
) -> Option<TaggedValue> {
    first_normalized(profile, response, &VILLAGE_ATTRIBUTES)
}

/// A sector is never a district, a province, the country, or a street.
/// Province and road words are checked on the raw text too, since cleaning
/// strips a trailing "Province".
fn is_plausible_sector(profile: &CountryProfile, raw: &str, normalized: &str) -> bool {
    !normalized.trim().is_empty()
        && !profile.is_district(normalized)
        && ![raw, normalized]
            .iter()
            .any(|name| profile.is_province_like(name) || profile.is_road_like(name))
}

/// Display names run most specific first ("road, sector, district, province,
/// country"). Locate the district, then take the first plausible part before it.
fn sector_from_display_name(
    profile: &CountryProfile,
    display_name: Option<&str>,
    district: Option<&str>,
) -> Option<String> {
    let normalizer = profile.normalizer();
    let parts: Vec<&str> = display_name?
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let matches_context = |part: &&str| {
        district.is_some_and(|d| normalizer.normalize_district(part).eq_ignore_ascii_case(d))
    };
    let district_index = parts
        .iter()
        .position(matches_context)
        .or_else(|| {
            parts
                .iter()
                .position(|part| profile.is_district(&normalizer.normalize_district(part)))
        })?;

    parts[..district_index]
        .iter()
        .map(|part| (*part, normalizer.normalize_sector(part)))
        .find(|(raw, candidate)| is_plausible_sector(profile, raw, candidate))
        .map(|(_, candidate)| candidate)
}

fn first_present<'a>(
    response: &'a NominatimResponse,
    attributes: &[&'static str],
) -> Option<(&'static str, &'a str)> {
    attributes.iter().find_map(|attribute| {
        response
            .attribute(attribute)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (*attribute, v))
    })
}

fn first_normalized(
    profile: &CountryProfile,
    response: &NominatimResponse,
    attributes: &[&'static str],
) -> Option<TaggedValue> {
    first_present(response, attributes).map(|(source, value)| TaggedValue {
        value: profile.normalizer().normalize_sector(value),
        source: source.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(display_name: Option<&str>, address: &[(&str, &str)]) -> NominatimResponse {
        NominatimResponse::from_parts(display_name, address.iter().copied())
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_district_from_county_is_high() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_district(&profile, &response(None, &[("county", "Gasabo")]));
        assert_eq!(candidate, FieldCandidate::new("Gasabo", Confidence::High, "county"));
    }

    #[test]
    fn test_district_from_city_is_medium() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_district(
            &profile,
            &response(None, &[("city", "Kicukiro District"), ("state", "Kigali City")]),
        );
        assert_eq!(candidate.value.as_deref(), Some("Kicukiro"));
        assert_eq!(candidate.confidence, Confidence::Medium);
        assert_eq!(candidate.source.as_deref(), Some("city"));
    }

    #[test]
    fn test_district_priority_order() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_district(
            &profile,
            &response(None, &[("city", "Nyarugenge"), ("district", "akarere ka HUYE")]),
        );
        assert_eq!(candidate.value.as_deref(), Some("Huye"));
        assert_eq!(candidate.source.as_deref(), Some("district"));
        assert_eq!(candidate.confidence, Confidence::High);
    }

    #[test]
    fn test_district_skips_unknown_names() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_district(
            &profile,
            &response(None, &[("county", "Kigali"), ("municipality", "Musanze")]),
        );
        assert_eq!(candidate.value.as_deref(), Some("Musanze"));
        assert_eq!(candidate.confidence, Confidence::Medium);
    }

    #[test]
    fn test_district_none_is_low() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_district(&profile, &response(None, &[("city", "Kigali")]));
        assert_eq!(candidate, FieldCandidate::empty());
    }

    #[test]
    fn test_sector_from_suburb() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(None, &[("suburb", "kimihurura"), ("county", "Gasabo")]),
            Some("Gasabo"),
        );
        assert_eq!(candidate, FieldCandidate::new("Kimihurura", Confidence::Medium, "suburb"));
    }

    #[test]
    fn test_sector_rejects_district_name() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(None, &[("suburb", "Gasabo"), ("county", "Gasabo")]),
            Some("Gasabo"),
        );
        assert_eq!(candidate, FieldCandidate::empty());
    }

    #[test]
    fn test_sector_rejects_district_name_with_fallback() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(
                Some("Remera, Gasabo, Kigali City, Rwanda"),
                &[("suburb", "Gasabo District")],
            ),
            Some("Gasabo"),
        );
        assert_eq!(candidate.value.as_deref(), Some("Remera"));
        assert_eq!(candidate.confidence, Confidence::Low);
        assert_eq!(candidate.source.as_deref(), Some(DISPLAY_NAME_SOURCE));
    }

    #[test]
    fn test_sector_rejects_province_country_and_roads() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(
                None,
                &[
                    ("suburb", "Eastern Province"),
                    ("neighbourhood", "Rwanda"),
                    ("town", "Airport Road"),
                    ("locality", "Nyamata"),
                ],
            ),
            None,
        );
        assert_eq!(candidate, FieldCandidate::new("Nyamata", Confidence::Medium, "locality"));
    }

    #[test]
    fn test_sector_fallback_skips_road_and_province_parts() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(
                Some("KN 5 Road, Umurenge wa Nyamirambo, Nyarugenge, Kigali City, Rwanda"),
                &[],
            ),
            None,
        );
        assert_eq!(candidate.value.as_deref(), Some("Nyamirambo"));
        assert_eq!(candidate.confidence, Confidence::Low);
    }

    #[test]
    fn test_sector_fallback_prefers_context_district() {
        let profile = CountryProfile::rwanda();
        // "Kicukiro" appears first but the resolved district is Gasabo
        let candidate = extract_sector(
            &profile,
            &response(Some("Kicukiro, Kacyiru, Gasabo, Rwanda"), &[]),
            Some("Gasabo"),
        );
        assert_eq!(candidate.value.as_deref(), Some("Kacyiru"));
    }

    #[test]
    fn test_sector_fallback_without_district_part() {
        let profile = CountryProfile::rwanda();
        let candidate = extract_sector(
            &profile,
            &response(Some("Somewhere, Kigali City, Rwanda"), &[]),
            None,
        );
        assert_eq!(candidate, FieldCandidate::empty());
    }

    #[test]
    fn test_road_falls_back_to_pedestrian_verbatim() {
        let road = extract_road(&response(
            None,
            &[("road", "  "), ("pedestrian", "KN 4 ave pedestrian way")],
        ))
        .unwrap();
        assert_eq!(road.value, "KN 4 ave pedestrian way");
        assert_eq!(road.source, "pedestrian");
    }

    #[test]
    fn test_road_missing() {
        assert!(extract_road(&response(None, &[("suburb", "Remera")])).is_none());
    }

    #[test]
    fn test_cell_and_village() {
        let profile = CountryProfile::rwanda();
        let place = response(None, &[("quarter", "RUKIRI I"), ("hamlet", "amahoro")]);
        assert_eq!(extract_cell(&profile, &place).unwrap().value, "Rukiri I");
        let village = extract_village(&profile, &place).unwrap();
        assert_eq!(village.value, "Amahoro");
        assert_eq!(village.source, "hamlet");
    }
}
