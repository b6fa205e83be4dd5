//! Events that drive dialog transitions

use crate::format::EventSummary;

/// Choice value the transport sends for the back button.
pub const BACK_VALUE: &str = "back";

/// Explicit commands a user can send (slash commands or their equivalent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
}

impl Command {
    pub fn parse(payload: &str) -> Option<Command> {
        match payload.trim_start_matches('/') {
            "start" => Some(Command::Start),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// One inbound user turn, as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Free-typed text (labels arrive this way from reply keyboards)
    Text(String),
    /// A button press carrying its opaque value
    Choice(String),
    Command(Command),
}

/// Events that trigger state transitions. User input comes from the
/// transport; search outcomes are fed back by the engine after it runs the
/// `Search` effect.
#[derive(Debug, Clone)]
pub enum DialogEvent {
    Input(UserInput),
    SearchCompleted { events: Vec<EventSummary> },
    SearchFailed,
}
