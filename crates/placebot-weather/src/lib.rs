//! Weather adapter for Placebot
//!
//! Thin client over the Open-Meteo forecast and geocoding APIs. Snapshots
//! are fetched per request and never cached.

pub mod geocode;
pub mod provider;
pub mod types;

pub use geocode::Geocoder;
pub use provider::WeatherProvider;
pub use types::*;
