//! Per-user dialog state machine
//!
//! Pure transitions produce a new session value plus effects; the engine
//! executes effects and owns per-user serialization and rollback.

mod engine;
pub mod event;
pub mod reply;
mod state;
pub mod transition;

#[cfg(test)]
pub mod proptests;
#[cfg(test)]
pub mod testing;

pub use engine::{DialogEngine, INTERNAL_ERROR_TEXT};
pub use event::{Command, DialogEvent, UserInput};
pub use reply::{Choice, LinkButton, Reply};
pub use state::{DialogState, Session};
pub use transition::{transition, Effect, TransitionError, TransitionResult};
