//! Forward geocoding: city name to coordinates, via the Open-Meteo
//! geocoding API. Used by `/weather [city]` so users can ask about places
//! outside the catalog.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use placebot_core::retry::{with_retry, RetryConfig};

use crate::types::{GeocodedCity, WeatherError};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
}

/// Open-Meteo geocoding client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl Geocoder {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Resolve a city name to its best-matching coordinates.
    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, name: &str) -> Result<GeocodedCity, WeatherError> {
        let url = format!(
            "{}/v1/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(name)
        );

        let response = with_retry(self.retry.clone(), || self.client.get(&url).send()).await?;

        if !response.status().is_success() {
            return Err(WeatherError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: GeocodeResponse = response.json().await?;
        let top = body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::CityNotFound(name.to_string()))?;

        tracing::debug!("Geocoded '{}' to {} ({}, {})", name, top.name, top.latitude, top.longitude);

        Ok(GeocodedCity {
            name: top.name,
            latitude: top.latitude,
            longitude: top.longitude,
        })
    }
}
