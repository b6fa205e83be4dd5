//! Property-based tests for the dialog state machine
//!
//! Verify that key session invariants hold across all possible inputs.

use super::event::{Command, DialogEvent, UserInput, BACK_VALUE};
use super::state::{DialogState, Session};
use super::transition::transition;
use crate::catalog::Catalogs;
use crate::format::{summarize, EventSummary};
use crate::search::RawEvent;
use proptest::prelude::*;

fn catalogs() -> Catalogs {
    Catalogs::default()
}

// ============================================================================
// Generators
// ============================================================================

fn arb_summaries(max: usize) -> impl Strategy<Value = Vec<EventSummary>> {
    prop::collection::vec("[А-Яа-яA-Za-z ]{1,40}", 1..=max).prop_map(|titles| {
        titles
            .into_iter()
            .filter_map(|title| {
                summarize(&RawEvent {
                    title,
                    ..RawEvent::default()
                })
            })
            .collect()
    })
}

fn arb_session() -> impl Strategy<Value = Session> {
    let city = prop_oneof![Just("Москва"), Just("Санкт-Петербург"), Just("Казань")];
    let category = prop_oneof![Just("🎵 Концерты"), Just("🎭 Театры")];

    prop_oneof![
        Just(Session::default()),
        city.clone().prop_map(|city| Session {
            state: DialogState::AwaitingCategory,
            city: Some(city.to_string()),
            ..Session::default()
        }),
        (city, category, arb_summaries(10)).prop_map(|(city, category, events)| Session {
            state: DialogState::BrowsingEvents,
            city: Some(city.to_string()),
            category: Some(category.to_string()),
            events,
        }),
    ]
}

/// Inputs that are never a catalog label, back, or an index.
fn arb_junk_input() -> impl Strategy<Value = UserInput> {
    "[a-z #?!]{1,20}"
        .prop_filter("reserved values", |s| {
            s != BACK_VALUE && s.parse::<usize>().is_err()
        })
        .prop_map(UserInput::Text)
}

fn arb_user_input() -> impl Strategy<Value = UserInput> {
    prop_oneof![
        arb_junk_input(),
        Just(UserInput::Text("Москва".to_string())),
        Just(UserInput::Choice("🎵 Концерты".to_string())),
        Just(UserInput::Choice(BACK_VALUE.to_string())),
        (0usize..12).prop_map(|i| UserInput::Choice(i.to_string())),
        Just(UserInput::Command(Command::Start)),
        Just(UserInput::Command(Command::Cancel)),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Junk input never changes the session, in any state.
    #[test]
    fn rejection_is_idempotent(session in arb_session(), input in arb_junk_input()) {
        if let Ok(result) = transition(&session, &catalogs(), DialogEvent::Input(input)) {
            prop_assert_eq!(result.session, session);
        }
    }

    /// Any accepted user input leaves the session structurally valid; in
    /// particular, events are held only while browsing.
    #[test]
    fn transitions_preserve_invariants(session in arb_session(), input in arb_user_input()) {
        prop_assume!(session.invariants_hold());
        if let Ok(result) = transition(&session, &catalogs(), DialogEvent::Input(input)) {
            prop_assert!(
                result.session.invariants_hold(),
                "invariants broken: {:?}",
                result.session
            );
        }
    }

    /// Back from category selection always restores the initial session.
    #[test]
    fn back_inverts_one_forward_step(city in prop_oneof![
        Just("Москва"), Just("Санкт-Петербург"), Just("Казань")
    ]) {
        let cats = catalogs();
        let forward = transition(
            &Session::default(),
            &cats,
            DialogEvent::Input(UserInput::Text(city.to_string())),
        ).unwrap();
        let back = transition(
            &forward.session,
            &cats,
            DialogEvent::Input(UserInput::Choice(BACK_VALUE.to_string())),
        ).unwrap();
        prop_assert_eq!(back.session, Session::default());
    }

    /// Search outcomes never corrupt a session they were not pending for.
    #[test]
    fn stray_search_outcomes_are_rejected(session in arb_session(), empty in any::<bool>()) {
        prop_assume!(session.state != DialogState::AwaitingCategory || session.category.is_none());
        let event = if empty {
            DialogEvent::SearchCompleted { events: vec![] }
        } else {
            DialogEvent::SearchFailed
        };
        prop_assert!(transition(&session, &catalogs(), event).is_err());
    }
}
