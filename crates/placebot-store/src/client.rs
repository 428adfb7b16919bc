//! Async wrapper around the SQLite store.
//!
//! `rusqlite` connections are not `Sync`; the client serializes access
//! through a mutex and hops blocking work onto the tokio blocking pool, so
//! concurrently handled commands can share one store safely.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::store::{FeedbackEntry, SqliteFeedbackStore};

/// Thread-safe async handle to the feedback/usage store.
#[derive(Clone)]
pub struct FeedbackClient {
    store: Arc<Mutex<SqliteFeedbackStore>>,
}

impl FeedbackClient {
    pub fn new(store: SqliteFeedbackStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Append a feedback entry.
    pub async fn append_feedback(&self, caller_id: &str, body: &str) -> StoreResult<FeedbackEntry> {
        let store = self.store.clone();
        let caller_id = caller_id.to_string();
        let body = body.to_string();
        tokio::task::spawn_blocking(move || store.lock().append_feedback(&caller_id, &body))
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
    }

    /// Increment the usage counter for a command.
    pub async fn increment_usage(&self, command: &str) -> StoreResult<()> {
        let store = self.store.clone();
        let command = command.to_string();
        tokio::task::spawn_blocking(move || store.lock().increment_usage(&command))
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
    }

    /// All usage counters, highest count first.
    pub async fn usage_counts(&self) -> StoreResult<Vec<(String, u64)>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.lock().usage_counts())
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
    }

    /// Total number of feedback entries.
    pub async fn feedback_count(&self) -> StoreResult<u64> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.lock().feedback_count())
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
    }
}

impl std::fmt::Debug for FeedbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FeedbackClient").finish()
    }
}
