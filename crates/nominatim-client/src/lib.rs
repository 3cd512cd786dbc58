//! Nominatim Geocoding Client
//!
//! A Rust client for the [Nominatim](https://nominatim.org/) reverse and
//! forward geocoding API. Every request carries an identifying User-Agent,
//! runs under an explicit timeout, and passes through a per-host concurrency
//! limiter so callers sharing one client share one upstream budget.

mod client;
mod error;
mod types;

pub use client::{NominatimClient, NominatimConfig};
pub use error::{NominatimError, Result};
pub use types::NominatimResponse;
