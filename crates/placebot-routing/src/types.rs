use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Route estimate between two points, valid for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Estimated travel time in seconds
    pub duration_seconds: f64,
    /// Shareable link to the rendered route
    pub map_url: String,
}

impl RouteSummary {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Duration rounded up to whole minutes.
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds / 60.0).ceil() as u64
    }
}
