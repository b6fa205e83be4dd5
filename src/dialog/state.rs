//! Dialog state types

use crate::format::EventSummary;
use serde::{Deserialize, Serialize};

/// Where the user is in the selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Waiting for a city pick (initial)
    #[default]
    AwaitingCity,
    /// City chosen, waiting for a category pick
    AwaitingCategory,
    /// Events fetched, user is browsing the list
    BrowsingEvents,
}

impl DialogState {
    /// The state one "back" step returns to. One level only; the flow keeps
    /// no deeper navigation stack.
    pub fn back_target(self) -> Option<DialogState> {
        match self {
            DialogState::AwaitingCity => None,
            DialogState::AwaitingCategory => Some(DialogState::AwaitingCity),
            DialogState::BrowsingEvents => Some(DialogState::AwaitingCategory),
        }
    }
}

/// Per-user dialog progress.
///
/// Created on first inbound event, mutated only by the dialog engine, never
/// deleted: a restart resets fields in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub state: DialogState,
    /// Selected city label (catalog key), set once past `AwaitingCity`
    pub city: Option<String>,
    /// Selected category label, set once a category has been accepted
    pub category: Option<String>,
    /// Last fetched result set; populated only in `BrowsingEvents`
    pub events: Vec<EventSummary>,
}

impl Session {
    /// Reset to initial defaults in place (restart/cancel).
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    /// Structural invariant: events are held only while browsing.
    #[allow(dead_code)] // State query used by tests
    pub fn invariants_hold(&self) -> bool {
        match self.state {
            DialogState::AwaitingCity => {
                self.city.is_none() && self.category.is_none() && self.events.is_empty()
            }
            DialogState::AwaitingCategory => self.city.is_some() && self.events.is_empty(),
            DialogState::BrowsingEvents => {
                self.city.is_some() && self.category.is_some() && !self.events.is_empty()
            }
        }
    }
}
