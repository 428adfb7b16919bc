//! Routing-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("No route between the given points")]
    NoRoute,

    #[error("Routing API error: {status}")]
    Api { status: u16 },

    #[error("Unexpected response shape: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RoutingError {
    /// User-facing message; never exposes upstream error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoRoute => "Could not find a route to that place.".to_string(),
            Self::Api { .. } => "The routing service returned an error. Try again later.".to_string(),
            Self::Parse(_) => "The routing service sent an unexpected reply.".to_string(),
            Self::Network(_) => "Could not reach the routing service. Try again later.".to_string(),
        }
    }
}
