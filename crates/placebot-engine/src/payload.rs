//! The reply unit handed back to the transport.

use serde::{Deserialize, Serialize};

use placebot_catalog::Place;
use placebot_routing::RouteSummary;
use placebot_weather::WeatherSnapshot;

/// One reply per request: plain text plus whatever structured data the
/// command produced. The transport renders this into its own message
/// format; the core never emits platform markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub text: String,
    pub weather: Option<WeatherSnapshot>,
    pub route: Option<RouteSummary>,
    /// Candidate places when a query was ambiguous, best first
    pub suggestions: Vec<Place>,
}

impl ReplyPayload {
    /// A text-only reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weather: None,
            route: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_weather(mut self, weather: WeatherSnapshot) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_route(mut self, route: RouteSummary) -> Self {
        self.route = Some(route);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Place>) -> Self {
        self.suggestions = suggestions;
        self
    }
}
