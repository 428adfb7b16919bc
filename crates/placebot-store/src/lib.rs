//! Feedback and usage storage for Placebot
//!
//! Append-only SQLite store: feedback entries are never mutated or deleted,
//! usage counters are only ever incremented. The async `FeedbackClient`
//! wrapper makes the store safe to share across concurrently handled
//! commands.

pub mod client;
pub mod error;
pub mod store;

pub use client::FeedbackClient;
pub use error::{StoreError, StoreResult};
pub use store::{FeedbackEntry, SqliteFeedbackStore, MAX_FEEDBACK_LENGTH};
