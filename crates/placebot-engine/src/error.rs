//! Engine-level error types.

use thiserror::Error;

use placebot_store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// `/stats` from a caller without the admin flag. The denial is generic
    /// so non-admins learn nothing about the command.
    #[error("Not authorized")]
    Unauthorized,

    /// Every provider the command needed failed or timed out.
    #[error("All required providers failed")]
    CommandFailed,

    /// The store could not record something the command had to record.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    /// User-facing message; never exposes internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Sorry, I can't do that for you.",
            Self::CommandFailed => "Could not fetch the data right now. Please try again later.",
            Self::Storage(_) => "Could not save that right now. Please try again later.",
        }
    }
}
