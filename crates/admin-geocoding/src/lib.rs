//! Administrative reverse geocoding
//!
//! Resolves a coordinate into province, district, sector, cell, village and
//! road for one country, reconciling several Nominatim lookups taken at
//! decreasing zoom. Reference data (districts, provinces, naming rules) comes
//! from an injected [`CountryProfile`]; [`CountryProfile::rwanda`] is builtin.
//!
//! ```no_run
//! use admin_geocoding::{AdminGeocoder, CountryProfile, FanoutConfig};
//! use nominatim_client::NominatimClient;
//!
//! # async fn example() -> admin_geocoding::Result<()> {
//! let client = NominatimClient::with_base_url("https://nominatim.openstreetmap.org")?;
//! let geocoder = AdminGeocoder::new(client, CountryProfile::rwanda(), FanoutConfig::default());
//!
//! let address = geocoder.resolve(-1.9441, 30.0619).await?;
//! println!("{} ({:?})", address.address_text, address.confidence);
//! # Ok(())
//! # }
//! ```

mod bounds;
mod error;
mod extract;
mod fanout;
mod geocoder;
mod merge;
mod normalize;
mod profile;

pub use bounds::BoundingBox;
pub use error::{GeocodingError, Result};
pub use extract::{
    extract_cell, extract_district, extract_road, extract_sector, extract_village, Confidence,
    FieldCandidate, TaggedValue,
};
pub use fanout::{collect_responses, query_provider, FanoutConfig};
pub use geocoder::{AddressCandidate, AdminGeocoder};
pub use merge::{merge, overall_confidence, FieldSlot, FieldSources, GeocodeResult};
pub use normalize::{NameNormalizer, NamingRules};
pub use profile::{CountryProfile, ProfileData};
