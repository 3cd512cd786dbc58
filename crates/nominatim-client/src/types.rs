use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// One place returned by Nominatim's `/reverse` or `/search` endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimResponse {
    #[serde(default)]
    pub display_name: Option<String>,
    /// Flat attribute map (county, suburb, road, country_code, ...)
    #[serde(default, deserialize_with = "string_attributes")]
    pub address: HashMap<String, String>,
    #[serde(default, rename = "boundingbox")]
    pub bounding_box: Option<Vec<String>>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl NominatimResponse {
    /// Build a response from a display name and address attributes
    pub fn from_parts<I, K, V>(display_name: Option<&str>, address: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            display_name: display_name.map(str::to_string),
            address: address
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Value of an address attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.address.get(name).map(String::as_str)
    }

    /// ISO 3166-1 alpha-2 country code as reported by the provider
    pub fn country_code(&self) -> Option<&str> {
        self.attribute("country_code")
    }

    /// Parsed `(lat, lon)` of the place, present on search hits
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.trim().parse().ok()?;
        let lon = self.lon.as_deref()?.trim().parse().ok()?;
        Some((lat, lon))
    }
}

/// Keep only string-valued attributes; Nominatim occasionally mixes in others
fn string_attributes<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}
