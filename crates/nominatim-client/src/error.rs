//! Failures of a single Nominatim request

use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum NominatimError {
    /// Latitude outside -90..90 or longitude outside -180..180
    InvalidCoordinates(f64, f64),
    /// Transport failure, timeout, or an undecodable body
    Http(reqwest::Error),
    /// Non-success HTTP status
    Status(StatusCode),
    /// 200 response carrying `{"error": ...}`, e.g. "Unable to geocode"
    NoResult(String),
    /// The per-host limiter was shut down
    LimiterClosed,
}

impl fmt::Display for NominatimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinates(lat, lon) => {
                write!(f, "Coordinates out of range: {lat}, {lon}")
            }
            Self::Http(e) => write!(f, "Nominatim request failed: {e}"),
            Self::Status(status) => write!(f, "Nominatim returned status {status}"),
            Self::NoResult(reason) => write!(f, "Nominatim found nothing: {reason}"),
            Self::LimiterClosed => write!(f, "Nominatim rate limiter closed"),
        }
    }
}

impl std::error::Error for NominatimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NominatimError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, NominatimError>;
