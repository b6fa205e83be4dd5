//! Pure dialog transition function
//!
//! Given the current session and one event, produces the next session value
//! plus the effects to run. No I/O happens here; the engine executes effects
//! and feeds search outcomes back in as events.

use super::event::{Command, DialogEvent, UserInput, BACK_VALUE};
use super::reply::{self, Reply};
use super::state::{DialogState, Session};
use crate::catalog::Catalogs;
use crate::search::MAX_RESULTS;
use thiserror::Error;

pub const WELCOME_TEXT: &str = "🎉 Добро пожаловать в бот для поиска событий!\nВыберите город:";
pub const SELECT_CITY_TEXT: &str = "Выберите город:";
pub const SELECT_CATEGORY_TEXT: &str = "Выберите категорию событий:";
pub const SELECT_EVENT_TEXT: &str = "Выберите событие:";
pub const CITY_RETRY_TEXT: &str = "Пожалуйста, выберите город из списка:";
pub const CATEGORY_RETRY_TEXT: &str = "Пожалуйста, выберите категорию из списка:";
pub const EVENT_RETRY_TEXT: &str = "Пожалуйста, выберите событие из списка:";
pub const NOTHING_FOUND_TEXT: &str = "😔 Событий не найдено";
pub const SEARCH_UNAVAILABLE_TEXT: &str = "Сервис временно недоступен, попробуйте позже.";
pub const CANCELLED_TEXT: &str = "Поиск отменён.";

/// Effects to be executed after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit a render instruction to the transport
    Reply(Reply),
    /// Run the events search (the engine feeds the outcome back as a
    /// `SearchCompleted`/`SearchFailed` event)
    Search {
        city_code: String,
        category_code: String,
    },
}

/// Result of one transition step.
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_reply(self, reply: Reply) -> Self {
        self.with_effect(Effect::Reply(reply))
    }
}

/// Errors a transition can raise. These are engine-boundary faults, not
/// user mistakes: invalid labels and out-of-range picks are handled inside
/// the transition by re-prompting.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("no transition from {state:?} for {event}")]
    InvalidTransition { state: DialogState, event: String },
    #[error("session is corrupt: {0}")]
    CorruptSession(String),
}

/// Pure transition function.
pub fn transition(
    session: &Session,
    catalogs: &Catalogs,
    event: DialogEvent,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // Commands reset the session from any state. The record survives; a
        // second restart is a no-op apart from the greeting.
        DialogEvent::Input(UserInput::Command(command)) => {
            let mut next = session.clone();
            next.reset();
            let result = TransitionResult::new(next);
            Ok(match command {
                Command::Start => {
                    result.with_reply(reply::city_prompt(WELCOME_TEXT, &catalogs.cities))
                }
                Command::Cancel => result
                    .with_reply(Reply::text(CANCELLED_TEXT))
                    .with_reply(reply::city_prompt(SELECT_CITY_TEXT, &catalogs.cities)),
            })
        }

        DialogEvent::Input(UserInput::Text(value)) | DialogEvent::Input(UserInput::Choice(value)) => {
            if value == BACK_VALUE {
                return Ok(on_back(session, catalogs));
            }
            match session.state {
                DialogState::AwaitingCity => on_city_input(session, catalogs, &value),
                DialogState::AwaitingCategory => on_category_input(session, catalogs, &value),
                DialogState::BrowsingEvents => on_event_input(session, catalogs, &value),
            }
        }

        DialogEvent::SearchCompleted { events } => {
            if session.state != DialogState::AwaitingCategory || session.category.is_none() {
                return Err(TransitionError::InvalidTransition {
                    state: session.state,
                    event: "SearchCompleted".to_string(),
                });
            }

            let mut next = session.clone();
            if events.is_empty() {
                // Nothing usable came back: stay put, drop the partial pick
                next.category = None;
                Ok(TransitionResult::new(next)
                    .with_reply(Reply::text(NOTHING_FOUND_TEXT))
                    .with_reply(reply::category_prompt(
                        SELECT_CATEGORY_TEXT,
                        &catalogs.categories,
                    )))
            } else {
                next.state = DialogState::BrowsingEvents;
                next.events = events;
                next.events.truncate(MAX_RESULTS);
                let prompt = reply::event_list_prompt(SELECT_EVENT_TEXT, &next.events);
                Ok(TransitionResult::new(next).with_reply(prompt))
            }
        }

        DialogEvent::SearchFailed => {
            if session.state != DialogState::AwaitingCategory || session.category.is_none() {
                return Err(TransitionError::InvalidTransition {
                    state: session.state,
                    event: "SearchFailed".to_string(),
                });
            }

            // Do not advance and do not cache anything from the failed call
            let mut next = session.clone();
            next.category = None;
            Ok(TransitionResult::new(next)
                .with_reply(Reply::text(SEARCH_UNAVAILABLE_TEXT))
                .with_reply(reply::category_prompt(
                    SELECT_CATEGORY_TEXT,
                    &catalogs.categories,
                )))
        }
    }
}

/// One navigation step back. The target is derived from the current state;
/// selections belonging to the step being re-entered are cleared so the
/// entry prompt always asks for a fresh pick.
fn on_back(session: &Session, catalogs: &Catalogs) -> TransitionResult {
    let mut next = session.clone();
    match session.state.back_target() {
        Some(DialogState::AwaitingCity) => {
            next.state = DialogState::AwaitingCity;
            next.city = None;
            next.category = None;
            TransitionResult::new(next)
                .with_reply(reply::city_prompt(SELECT_CITY_TEXT, &catalogs.cities))
        }
        Some(DialogState::AwaitingCategory) => {
            next.state = DialogState::AwaitingCategory;
            next.category = None;
            next.events.clear();
            TransitionResult::new(next).with_reply(reply::category_prompt(
                SELECT_CATEGORY_TEXT,
                &catalogs.categories,
            ))
        }
        // Nowhere further back from the initial prompt: treat as an
        // invalid pick and re-prompt
        Some(DialogState::BrowsingEvents) | None => TransitionResult::new(next)
            .with_reply(reply::city_prompt(CITY_RETRY_TEXT, &catalogs.cities)),
    }
}

fn on_city_input(
    session: &Session,
    catalogs: &Catalogs,
    value: &str,
) -> Result<TransitionResult, TransitionError> {
    if catalogs.cities.contains(value) {
        let mut next = session.clone();
        next.city = Some(value.to_string());
        next.state = DialogState::AwaitingCategory;
        Ok(TransitionResult::new(next).with_reply(reply::category_prompt(
            SELECT_CATEGORY_TEXT,
            &catalogs.categories,
        )))
    } else {
        // Rejected input leaves the session untouched
        Ok(TransitionResult::new(session.clone())
            .with_reply(reply::city_prompt(CITY_RETRY_TEXT, &catalogs.cities)))
    }
}

fn on_category_input(
    session: &Session,
    catalogs: &Catalogs,
    value: &str,
) -> Result<TransitionResult, TransitionError> {
    let Some(category_code) = catalogs.categories.code_for(value) else {
        return Ok(TransitionResult::new(session.clone()).with_reply(reply::category_prompt(
            CATEGORY_RETRY_TEXT,
            &catalogs.categories,
        )));
    };

    let city_code = session
        .city
        .as_deref()
        .and_then(|label| catalogs.cities.code_for(label))
        .ok_or_else(|| {
            TransitionError::CorruptSession("awaiting category without a valid city".to_string())
        })?;

    let mut next = session.clone();
    next.category = Some(value.to_string());
    Ok(TransitionResult::new(next).with_effect(Effect::Search {
        city_code: city_code.to_string(),
        category_code: category_code.to_string(),
    }))
}

fn on_event_input(
    session: &Session,
    _catalogs: &Catalogs,
    value: &str,
) -> Result<TransitionResult, TransitionError> {
    match value.parse::<usize>() {
        Ok(idx) if idx < session.events.len() => {
            let detail = reply::event_detail(&session.events[idx]);
            Ok(TransitionResult::new(session.clone()).with_reply(detail))
        }
        // Out-of-range or non-numeric: reject without mutating anything
        _ => {
            let prompt = reply::event_list_prompt(EVENT_RETRY_TEXT, &session.events);
            Ok(TransitionResult::new(session.clone()).with_reply(prompt))
        }
    }
}
