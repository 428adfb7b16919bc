//! Routing adapter for Placebot
//!
//! Thin client over an OSRM-compatible routing API. Route summaries carry a
//! distance/duration estimate plus a shareable map link for the destination.

pub mod client;
pub mod error;
pub mod types;

pub use client::{build_map_link, RoutingClient};
pub use error::RoutingError;
pub use types::{Coordinates, RouteSummary};
