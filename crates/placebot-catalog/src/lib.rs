//! Place catalog for Placebot
//!
//! Holds the directory of known places, loaded once at startup and read-only
//! afterwards, plus the resolver that turns raw user text into place
//! candidates.

pub mod catalog;
pub mod place;
pub mod resolve;

pub use catalog::{CatalogError, PlaceCatalog};
pub use place::Place;
pub use resolve::{ResolvedQuery, Resolver, MAX_SUGGESTIONS, SUGGEST_FLOOR, UNIQUE_THRESHOLD};
