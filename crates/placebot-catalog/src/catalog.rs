//! Catalog loading and name search.
//!
//! The catalog is loaded once from a JSON array and treated as read-only for
//! the process lifetime. Search scores display names deterministically:
//! exact 100, prefix 85, substring 70, otherwise scaled token overlap.
//! Ties keep catalog insertion order.

use std::path::Path;

use rand::seq::SliceRandom;
use thiserror::Error;

use crate::place::Place;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog is not a valid JSON list of places: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate place id in catalog: {0}")]
    DuplicateId(String),
}

/// Read-only directory of known places.
pub struct PlaceCatalog {
    places: Vec<Place>,
}

impl PlaceCatalog {
    /// Load the catalog from a JSON array file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let places: Vec<Place> = serde_json::from_str(&contents)?;

        let catalog = Self::from_places(places)?;
        tracing::info!("Loaded {} places from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Build a catalog from an in-memory list, validating id uniqueness.
    pub fn from_places(places: Vec<Place>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for place in &places {
            if !seen.insert(place.id.as_str()) {
                return Err(CatalogError::DuplicateId(place.id.clone()));
            }
        }
        Ok(Self { places })
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// All places in catalog insertion order.
    pub fn all(&self) -> &[Place] {
        &self.places
    }

    /// Exact identifier lookup.
    pub fn lookup_by_id(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    /// A random place, or `None` for an empty catalog.
    pub fn random(&self) -> Option<&Place> {
        self.places.choose(&mut rand::thread_rng())
    }

    /// Score all places against `text`, best first.
    ///
    /// Empty or whitespace-only input yields no matches. The sort is stable,
    /// so equal scores keep insertion order.
    pub fn search(&self, text: &str) -> Vec<(&Place, u8)> {
        let query = normalize(text);
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(&Place, u8)> = self
            .places
            .iter()
            .filter_map(|p| {
                let score = score_name(&query, &p.name);
                (score > 0).then_some((p, score))
            })
            .collect();

        hits.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
        hits
    }
}

/// Lowercase and collapse internal whitespace.
fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Deterministic match score for a normalized query against a display name.
pub(crate) fn score_name(query: &str, name: &str) -> u8 {
    let name = normalize(name);
    if name == query {
        return 100;
    }
    if name.starts_with(query) {
        return 85;
    }
    if name.contains(query) {
        return 70;
    }

    // Token overlap: each query token matches if some name token starts
    // with it. Scaled so a full overlap scores below a plain substring hit.
    let query_tokens: Vec<&str> = query.split(' ').collect();
    let name_tokens: Vec<&str> = name.split(' ').collect();
    let matched = query_tokens
        .iter()
        .filter(|qt| name_tokens.iter().any(|nt| nt.starts_with(**qt)))
        .count();

    if matched == 0 {
        0
    } else {
        (60 * matched / query_tokens.len()) as u8
    }
}
