//! Current-conditions fetch over the Open-Meteo forecast API.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use placebot_core::retry::{with_retry, RetryConfig};

use crate::types::{WeatherCondition, WeatherError, WeatherSnapshot};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    weather_code: Option<i32>,
}

/// Open-Meteo current-conditions client.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl WeatherProvider {
    /// Create a provider against the given API base URL.
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

    /// Fetch current conditions for a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current=temperature_2m,weather_code",
            self.base_url, latitude, longitude
        );

        let response = with_retry(self.retry.clone(), || self.client.get(&url).send()).await?;

        if !response.status().is_success() {
            return Err(WeatherError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: ForecastResponse = response.json().await?;
        let current = body
            .current
            .ok_or_else(|| WeatherError::Parse("missing 'current' block".to_string()))?;
        let temperature_c = current
            .temperature_2m
            .ok_or_else(|| WeatherError::Parse("missing temperature".to_string()))?;
        let condition = WeatherCondition::from_wmo_code(current.weather_code.unwrap_or(0));

        tracing::debug!("Weather at ({}, {}): {:.1}C {:?}", latitude, longitude, temperature_c, condition);

        Ok(WeatherSnapshot {
            temperature_c,
            condition,
            fetched_at: Utc::now(),
        })
    }
}
