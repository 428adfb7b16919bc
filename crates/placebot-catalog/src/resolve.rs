//! Query resolution: raw argument text to place candidates.
//!
//! Exact identifier lookup wins over name search, so `/route 12` keeps
//! working for users who picked an id from a previous reply, while plain
//! names resolve without one.

use std::sync::Arc;

use crate::catalog::PlaceCatalog;
use crate::place::Place;

/// Minimum score for a single candidate to resolve uniquely.
pub const UNIQUE_THRESHOLD: u8 = 70;
/// Minimum score for a candidate to appear as a suggestion.
pub const SUGGEST_FLOOR: u8 = 40;
/// Suggestion list cap, keeps replies readable.
pub const MAX_SUGGESTIONS: usize = 5;

/// Outcome of matching raw user text against the catalog.
#[derive(Debug, Clone)]
pub enum ResolvedQuery {
    /// Exactly one confident candidate.
    Unique(Place),
    /// Several candidates (or one weak one), ranked best first.
    Ambiguous(Vec<Place>),
    /// Nothing matched.
    NotFound,
}

/// Resolves command argument text against the catalog.
pub struct Resolver {
    catalog: Arc<PlaceCatalog>,
}

impl Resolver {
    pub fn new(catalog: Arc<PlaceCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve raw argument text into place candidates.
    pub fn resolve(&self, raw: &str) -> ResolvedQuery {
        let arg = raw.trim();
        if arg.is_empty() {
            return ResolvedQuery::NotFound;
        }

        // Exact id takes precedence over name search.
        if let Some(place) = self.catalog.lookup_by_id(arg) {
            tracing::debug!("Resolved '{}' by id", arg);
            return ResolvedQuery::Unique(place.clone());
        }

        let hits: Vec<(&Place, u8)> = self
            .catalog
            .search(arg)
            .into_iter()
            .filter(|(_, score)| *score >= SUGGEST_FLOOR)
            .collect();

        if hits.is_empty() {
            return ResolvedQuery::NotFound;
        }

        let strong: Vec<&(&Place, u8)> =
            hits.iter().filter(|(_, score)| *score >= UNIQUE_THRESHOLD).collect();

        if strong.len() == 1 {
            let place = strong[0].0.clone();
            tracing::debug!("Resolved '{}' uniquely to {}", arg, place.id);
            return ResolvedQuery::Unique(place);
        }

        ResolvedQuery::Ambiguous(
            hits.into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|(p, _)| p.clone())
                .collect(),
        )
    }
}
