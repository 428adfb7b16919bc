//! The command set and the normalized record the transport hands over.
//!
//! Routing is an exhaustive match over `CommandKind`, so adding a command is
//! a compile-time-checked change.

use serde::{Deserialize, Serialize};

/// Every command the assistant understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Greeting and command overview
    Start,
    Help,
    /// Liveness check
    Ping,
    /// List every place in the catalog
    List,
    /// Find a place by free text or identifier
    Find,
    /// A randomly picked place
    Random,
    /// Current weather, for a named city or the home city
    Weather,
    /// Route from the configured origin to a place
    Route,
    /// Weather and route briefing in one reply
    Plan,
    /// Record free-text feedback
    Feedback,
    /// Usage statistics, admin only
    Stats,
}

impl CommandKind {
    /// Parse a command name as sent by the transport. Case-insensitive; a
    /// leading slash is tolerated.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('/').to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "ping" => Some(Self::Ping),
            "list" => Some(Self::List),
            "find" => Some(Self::Find),
            "random" => Some(Self::Random),
            "weather" => Some(Self::Weather),
            "route" => Some(Self::Route),
            "plan" => Some(Self::Plan),
            "feedback" => Some(Self::Feedback),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }

    /// Canonical name, used for usage counters and help text.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Ping => "ping",
            Self::List => "list",
            Self::Find => "find",
            Self::Random => "random",
            Self::Weather => "weather",
            Self::Route => "route",
            Self::Plan => "plan",
            Self::Feedback => "feedback",
            Self::Stats => "stats",
        }
    }
}

/// Normalized command record from the transport.
///
/// `is_admin` is a verified caller-role flag attached by the transport; the
/// core trusts it and performs no authentication of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingCommand {
    pub command: CommandKind,
    /// Raw argument text, may be empty
    pub args: String,
    pub caller_id: String,
    pub is_admin: bool,
}

impl IncomingCommand {
    pub fn new(
        command: CommandKind,
        args: impl Into<String>,
        caller_id: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            command,
            args: args.into(),
            caller_id: caller_id.into(),
            is_admin,
        }
    }
}
