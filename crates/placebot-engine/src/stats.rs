//! Admin-facing usage summary.
//!
//! Authorization happens in the dispatcher, before this reporter is ever
//! invoked; the reporter itself only reads counters.

use placebot_store::{FeedbackClient, StoreResult};

pub struct StatsReporter {
    store: FeedbackClient,
}

impl StatsReporter {
    pub fn new(store: FeedbackClient) -> Self {
        Self { store }
    }

    /// Per-command usage counts plus the total number of feedback entries.
    pub async fn summary(&self) -> StoreResult<String> {
        let counts = self.store.usage_counts().await?;
        let feedback_total = self.store.feedback_count().await?;

        if counts.is_empty() && feedback_total == 0 {
            return Ok("No usage recorded yet. Run a few commands and ask again.".to_string());
        }

        let mut lines = vec!["Usage statistics".to_string()];
        for (command, count) in counts {
            lines.push(format!("/{}: {}", command, count));
        }
        lines.push(format!("Feedback entries: {}", feedback_total));

        Ok(lines.join("\n"))
    }
}
