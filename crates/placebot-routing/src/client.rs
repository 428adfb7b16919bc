//! OSRM routing API client.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use placebot_core::retry::{with_retry, RetryConfig};

use crate::error::RoutingError;
use crate::types::{Coordinates, RouteSummary};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

/// Build a shareable map link for a destination.
///
/// Prefers the street address when one is known, falling back to raw
/// coordinates.
pub fn build_map_link(destination: Coordinates, address: Option<&str>) -> String {
    match address {
        Some(addr) if !addr.trim().is_empty() => {
            format!("https://yandex.ru/maps/?rtext=~{}", urlencoding::encode(addr))
        }
        _ => format!(
            "https://yandex.ru/maps/?rtext=~{},{}",
            destination.latitude, destination.longitude
        ),
    }
}

pub struct RoutingClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl RoutingClient {
    pub fn new(base_url: &str) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Fetch a route estimate from origin to destination.
    ///
    /// `destination_address` feeds the shareable map link; it does not
    /// affect the routed geometry.
    #[instrument(skip(self, destination_address), level = "info")]
    pub async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        destination_address: Option<&str>,
    ) -> Result<RouteSummary, RoutingError> {
        // OSRM takes lon,lat pairs
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        );

        let response = with_retry(self.retry.clone(), || self.client.get(&url).send()).await?;

        if !response.status().is_success() {
            return Err(RoutingError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: OsrmResponse = response.json().await?;
        if body.code != "Ok" {
            tracing::debug!("OSRM returned code {}", body.code);
            return Err(RoutingError::NoRoute);
        }

        let route = body.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;

        Ok(RouteSummary {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            map_url: build_map_link(destination, destination_address),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_link_prefers_address() {
        let dest = Coordinates::new(59.9398, 30.3146);
        let link = build_map_link(dest, Some("Palace Square, 2"));
        assert!(link.starts_with("https://yandex.ru/maps/?rtext=~"));
        assert!(link.contains("Palace%20Square"));
    }

    #[test]
    fn test_map_link_falls_back_to_coordinates() {
        let dest = Coordinates::new(59.9398, 30.3146);
        assert_eq!(
            build_map_link(dest, None),
            "https://yandex.ru/maps/?rtext=~59.9398,30.3146"
        );
        // Blank addresses get the same treatment
        assert_eq!(build_map_link(dest, Some("  ")), build_map_link(dest, None));
    }
}
