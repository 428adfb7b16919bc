//! SQLite-based feedback and usage storage.
//!
//! Two tables: `feedback` is an append-only log of user feedback entries,
//! `command_usage` maps command names to invocation counts. Increments go
//! through a single UPSERT statement, so there is no read-modify-write
//! window even across processes.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// Maximum feedback body length, characters.
pub const MAX_FEEDBACK_LENGTH: usize = 2000;

/// One recorded feedback entry. Never mutated after append.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedbackEntry {
    pub id: i64,
    pub caller_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed feedback/usage store.
pub struct SqliteFeedbackStore {
    conn: Connection,
}

impl SqliteFeedbackStore {
    /// Open (or create) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::storage(e.to_string()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (tests, ephemeral runs).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::storage(e.to_string()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS feedback (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    caller_id TEXT NOT NULL,
                    body TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS command_usage (
                    command TEXT PRIMARY KEY,
                    count INTEGER NOT NULL DEFAULT 0
                );
                "#,
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;
        Ok(())
    }

    /// Append a feedback entry. The log is append-only: entries are never
    /// updated or deleted once written.
    pub fn append_feedback(&self, caller_id: &str, body: &str) -> StoreResult<FeedbackEntry> {
        validate_body(body)?;

        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO feedback (caller_id, body, created_at) VALUES (?1, ?2, ?3)",
                params![caller_id, body, now.to_rfc3339()],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Recorded feedback entry {} from {}", id, caller_id);

        Ok(FeedbackEntry {
            id,
            caller_id: caller_id.to_string(),
            body: body.to_string(),
            created_at: now,
        })
    }

    /// Increment the usage counter for a command by one.
    pub fn increment_usage(&self, command: &str) -> StoreResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO command_usage (command, count) VALUES (?1, 1)
                ON CONFLICT(command) DO UPDATE SET count = count + 1
                "#,
                params![command],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;
        Ok(())
    }

    /// All usage counters, highest count first, name order on ties.
    pub fn usage_counts(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT command, count FROM command_usage ORDER BY count DESC, command ASC")
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })
            .map_err(|e| StoreError::storage(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::storage(e.to_string()))
    }

    /// Total number of feedback entries.
    pub fn feedback_count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
            .map_err(|e| StoreError::storage(e.to_string()))?;
        Ok(count as u64)
    }
}

/// Validate a feedback body.
fn validate_body(body: &str) -> StoreResult<()> {
    if body.trim().is_empty() {
        return Err(StoreError::validation("Feedback cannot be empty"));
    }
    if body.len() > MAX_FEEDBACK_LENGTH {
        return Err(StoreError::validation(format!(
            "Feedback exceeds maximum length of {} characters",
            MAX_FEEDBACK_LENGTH
        )));
    }
    Ok(())
}
