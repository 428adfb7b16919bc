use serde::{Deserialize, Serialize};

/// A named, coordinate-tagged location the assistant can discuss.
///
/// Immutable after catalog load; identifiers are unique within a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Stable identifier, unique within the catalog
    pub id: String,
    /// Display name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Street address, used for route links
    #[serde(default)]
    pub address: Option<String>,
    /// Opening hours, free-form
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Place {
    /// (latitude, longitude) pair
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
