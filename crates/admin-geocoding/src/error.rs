//! Error types for administrative geocoding

use std::fmt;

/// Hard failures of a resolution. A low-confidence result is not an error;
/// see [`crate::GeocodeResult::is_partial`].
#[derive(Debug)]
pub enum GeocodingError {
    /// Coordinate outside the country's bounding box; no provider call was made
    OutOfBounds(f64, f64),
    /// Every zoom-level lookup failed or came back for another country
    UpstreamUnavailable,
    /// Provider failure on a single-call operation, or client construction
    Provider(nominatim_client::NominatimError),
    /// Reference data could not be loaded or compiled
    Profile(String),
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(lat, lon) => {
                write!(f, "Coordinates out of bounds: {lat}, {lon}")
            }
            Self::UpstreamUnavailable => write!(f, "No usable geocoding data from upstream"),
            Self::Provider(e) => write!(f, "Geocoding provider error: {e}"),
            Self::Profile(msg) => write!(f, "Country profile error: {msg}"),
        }
    }
}

impl std::error::Error for GeocodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(e) => Some(e),
            _ => None,
        }
    }
}

impl From<nominatim_client::NominatimError> for GeocodingError {
    fn from(e: nominatim_client::NominatimError) -> Self {
        Self::Provider(e)
    }
}

pub type Result<T> = std::result::Result<T, GeocodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let err = GeocodingError::OutOfBounds(0.35, 32.58);
        assert_eq!(err.to_string(), "Coordinates out of bounds: 0.35, 32.58");
    }

    #[test]
    fn test_provider_error_has_source() {
        let err: GeocodingError =
            nominatim_client::NominatimError::NoResult("Unable to geocode".to_string()).into();
        assert!(err.to_string().contains("Unable to geocode"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_profile_error_display() {
        let err = GeocodingError::Profile("missing districts".to_string());
        assert_eq!(err.to_string(), "Country profile error: missing districts");
    }
}
