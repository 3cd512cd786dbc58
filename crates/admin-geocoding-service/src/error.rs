//! Error types for the geocoding service

use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Geocoder construction or profile loading failed
    Geocoding(admin_geocoding::GeocodingError),
    /// Configuration error
    Config(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geocoding(e) => write!(f, "{}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geocoding(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<admin_geocoding::GeocodingError> for ServiceError {
    fn from(e: admin_geocoding::GeocodingError) -> Self {
        Self::Geocoding(e)
    }
}

impl From<nominatim_client::NominatimError> for ServiceError {
    fn from(e: nominatim_client::NominatimError) -> Self {
        Self::Geocoding(e.into())
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServiceError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ServiceError::Config("bad PORT".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad PORT");
    }

    #[test]
    fn test_geocoding_error_passthrough() {
        let err: ServiceError =
            admin_geocoding::GeocodingError::Profile("empty table".to_string()).into();
        assert_eq!(err.to_string(), "Country profile error: empty table");
    }
}
