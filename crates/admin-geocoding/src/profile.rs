//! Country reference data: bounding box, districts and their provinces,
//! naming rules, and the words that disqualify a sector candidate.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::error::{GeocodingError, Result};
use crate::normalize::{NameNormalizer, NamingRules};

/// Serializable form of a country profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    /// ISO 3166-1 alpha-2, compared case-insensitively
    pub country_code: String,
    /// Appended to every composed address
    pub country_name: String,
    pub bounds: BoundingBox,
    /// Naming rules keyed by locale
    pub naming: BTreeMap<String, NamingRules>,
    /// A sector candidate containing one of these words is a province
    #[serde(default)]
    pub province_words: Vec<String>,
    /// A sector candidate containing one of these words is a street
    #[serde(default)]
    pub road_keywords: Vec<String>,
    /// Canonical district name -> province name
    pub districts: BTreeMap<String, String>,
}

/// Read-only reference data used as ground truth by the extractors
#[derive(Debug, Clone)]
pub struct CountryProfile {
    data: ProfileData,
    normalizer: NameNormalizer,
    /// Lower-cased district -> province
    district_index: HashMap<String, String>,
}

impl CountryProfile {
    pub fn new(data: ProfileData) -> Result<Self> {
        let normalizer = NameNormalizer::new(&data.naming)
            .map_err(|e| GeocodingError::Profile(format!("invalid naming rules: {e}")))?;

        let district_index = data
            .districts
            .iter()
            .map(|(district, province)| (district.to_lowercase(), province.clone()))
            .collect();

        let mut data = data;
        data.province_words = lowercase_all(&data.province_words);
        data.road_keywords = lowercase_all(&data.road_keywords);

        Ok(Self {
            data,
            normalizer,
            district_index,
        })
    }

    /// Builtin profile for Rwanda
    pub fn rwanda() -> Arc<Self> {
        RWANDA.clone()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: ProfileData = serde_json::from_str(json)
            .map_err(|e| GeocodingError::Profile(format!("invalid profile JSON: {e}")))?;
        Self::new(data)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GeocodingError::Profile(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn country_code(&self) -> &str {
        &self.data.country_code
    }

    pub fn country_name(&self) -> &str {
        &self.data.country_name
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.data.bounds
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Whether the coordinate falls inside the country's bounding box
    pub fn is_in_country(&self, latitude: f64, longitude: f64) -> bool {
        self.bounds().contains(latitude, longitude)
    }

    /// Case-insensitive country-code match
    pub fn is_country_code(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(&self.data.country_code)
    }

    /// Whether an already-normalized name is a known district
    pub fn is_district(&self, name: &str) -> bool {
        self.district_index.contains_key(&name.trim().to_lowercase())
    }

    /// Province for a district name; the name is normalized before lookup
    pub fn province_for(&self, district: &str) -> Option<&str> {
        let normalized = self.normalizer.normalize_district(district);
        self.district_index
            .get(&normalized.to_lowercase())
            .map(String::as_str)
    }

    pub(crate) fn is_province_like(&self, name: &str) -> bool {
        contains_any_word(name, &self.data.province_words)
            || name.trim().eq_ignore_ascii_case(&self.data.country_name)
    }

    pub(crate) fn is_road_like(&self, name: &str) -> bool {
        contains_any_word(name, &self.data.road_keywords)
    }
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.trim().to_lowercase()).collect()
}

fn contains_any_word(text: &str, words: &[String]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|w| {
            let w = w.to_lowercase();
            words.iter().any(|k| *k == w)
        })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rwanda_data() -> ProfileData {
    let mut naming = BTreeMap::new();
    naming.insert(
        "rw".to_string(),
        NamingRules {
            prefixes: strings(&[
                "akarere ka",
                "umurenge wa",
                "intara y'",
                "intara y\u{2019}",
                "intara ya",
            ]),
            suffixes: vec![],
        },
    );
    naming.insert(
        "fr".to_string(),
        NamingRules {
            prefixes: strings(&[
                "district de",
                "secteur de",
                "province de",
                "province du",
            ]),
            suffixes: vec![],
        },
    );
    naming.insert(
        "en".to_string(),
        NamingRules {
            prefixes: vec![],
            suffixes: strings(&["district", "sector", "province", "city"]),
        },
    );

    let mut districts = BTreeMap::new();
    for (province, names) in RWANDA_DISTRICTS {
        for name in *names {
            districts.insert(name.to_string(), province.to_string());
        }
    }

    ProfileData {
        country_code: "rw".to_string(),
        country_name: "Rwanda".to_string(),
        bounds: BoundingBox {
            min_lat: -2.84,
            max_lat: -1.04,
            min_lon: 28.86,
            max_lon: 30.9,
        },
        naming,
        province_words: strings(&["province", "intara"]),
        road_keywords: strings(&["road", "street", "avenue", "boulevard", "highway", "route"]),
        districts,
    }
}

const RWANDA_DISTRICTS: &[(&str, &[&str])] = &[
    ("Kigali City", &["Gasabo", "Kicukiro", "Nyarugenge"]),
    (
        "Southern Province",
        &[
            "Gisagara", "Huye", "Kamonyi", "Muhanga", "Nyamagabe", "Nyanza", "Nyaruguru",
            "Ruhango",
        ],
    ),
    (
        "Western Province",
        &[
            "Karongi",
            "Ngororero",
            "Nyabihu",
            "Nyamasheke",
            "Rubavu",
            "Rusizi",
            "Rutsiro",
        ],
    ),
    (
        "Northern Province",
        &["Burera", "Gakenke", "Gicumbi", "Musanze", "Rulindo"],
    ),
    (
        "Eastern Province",
        &[
            "Bugesera",
            "Gatsibo",
            "Kayonza",
            "Kirehe",
            "Ngoma",
            "Nyagatare",
            "Rwamagana",
        ],
    ),
];

lazy_static::lazy_static! {
    static ref RWANDA: Arc<CountryProfile> = Arc::new(
        CountryProfile::new(rwanda_data()).expect("builtin Rwanda profile is valid")
    );
}
