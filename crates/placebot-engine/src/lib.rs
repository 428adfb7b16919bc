//! Command dispatch and aggregation for Placebot
//!
//! Takes normalized commands from the transport, resolves place queries
//! against the catalog, fans out to the weather and routing providers, and
//! merges whatever came back into one reply payload. Partial provider
//! failure degrades the reply instead of failing it; only a command whose
//! every required provider failed reports an error.

pub mod command;
pub mod engine;
pub mod error;
pub mod payload;
pub mod stats;

pub use command::{CommandKind, IncomingCommand};
pub use engine::{Engine, EngineSettings};
pub use error::EngineError;
pub use payload::ReplyPayload;
pub use stats::StatsReporter;
