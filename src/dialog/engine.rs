//! Dialog engine: drives transitions and executes their effects
//!
//! The engine is the only mutator of sessions. It serializes transitions per
//! user, runs the events search when a transition asks for one, and rolls the
//! session back whenever a transition faults, so no partial mutation is ever
//! persisted.

use super::event::{DialogEvent, UserInput};
use super::reply::Reply;
use super::transition::{transition, Effect};
use crate::catalog::Catalogs;
use crate::format::summarize;
use crate::search::{EventSearch, MAX_RESULTS};
use crate::session::SessionStore;
use std::time::Instant;

pub const INTERNAL_ERROR_TEXT: &str = "Произошла ошибка. Попробуйте ещё раз.";

/// The per-user dialog engine.
pub struct DialogEngine<S: EventSearch> {
    store: SessionStore,
    search: S,
    catalogs: Catalogs,
    page_size: usize,
}

impl<S: EventSearch> DialogEngine<S> {
    pub fn new(search: S, catalogs: Catalogs, page_size: usize) -> Self {
        Self {
            store: SessionStore::new(),
            search,
            catalogs,
            page_size,
        }
    }

    #[allow(dead_code)] // Useful for tests
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Apply one inbound user turn and return the render instructions.
    ///
    /// Holds the user's session lock for the whole transition, including the
    /// search call, so concurrent turns from the same user apply in some
    /// serial order with no lost update.
    pub async fn handle(&self, user_id: &str, input: UserInput) -> Vec<Reply> {
        let slot = self.store.entry(user_id).await;
        let mut guard = slot.lock().await;

        let mut session = guard.clone();
        let mut replies = Vec::new();
        let mut event = Some(DialogEvent::Input(input));

        while let Some(ev) = event.take() {
            let result = match transition(&session, &self.catalogs, ev) {
                Ok(result) => result,
                Err(error) => {
                    // Boundary fault: roll back by not committing, apologize
                    tracing::error!(
                        user_id = %user_id,
                        state = ?guard.state,
                        error = %error,
                        "Dialog transition failed"
                    );
                    return vec![Reply::text(INTERNAL_ERROR_TEXT)];
                }
            };

            session = result.session;
            for effect in result.effects {
                match effect {
                    Effect::Reply(reply) => replies.push(reply),
                    Effect::Search {
                        city_code,
                        category_code,
                    } => {
                        event = Some(self.run_search(user_id, &city_code, &category_code).await);
                    }
                }
            }
        }

        *guard = session;
        replies
    }

    /// One search attempt; failures become events, never panics or retries.
    async fn run_search(&self, user_id: &str, city_code: &str, category_code: &str) -> DialogEvent {
        let start = Instant::now();
        match self
            .search
            .search(city_code, category_code, self.page_size)
            .await
        {
            Ok(raw_events) => {
                let events: Vec<_> = raw_events
                    .iter()
                    .filter_map(summarize)
                    .take(MAX_RESULTS)
                    .collect();
                tracing::info!(
                    user_id = %user_id,
                    city = %city_code,
                    category = %category_code,
                    duration_ms = %start.elapsed().as_millis(),
                    fetched = raw_events.len(),
                    kept = events.len(),
                    "Events search completed"
                );
                DialogEvent::SearchCompleted { events }
            }
            Err(error) => {
                tracing::warn!(
                    user_id = %user_id,
                    city = %city_code,
                    category = %category_code,
                    duration_ms = %start.elapsed().as_millis(),
                    kind = ?error.kind,
                    error = %error,
                    "Events search failed"
                );
                DialogEvent::SearchFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::MockSearchClient;
    use crate::dialog::transition::{
        NOTHING_FOUND_TEXT, SEARCH_UNAVAILABLE_TEXT, WELCOME_TEXT,
    };
    use crate::dialog::{Command, DialogState};
    use crate::search::{RawEvent, SearchError};
    use std::sync::Arc;
    use std::time::Duration;

    fn engine_with(search: MockSearchClient) -> DialogEngine<MockSearchClient> {
        DialogEngine::new(search, Catalogs::default(), 5)
    }

    fn raw(title: &str) -> RawEvent {
        RawEvent {
            title: title.to_string(),
            ..RawEvent::default()
        }
    }

    async fn state_of(engine: &DialogEngine<MockSearchClient>, user: &str) -> DialogState {
        engine.store().snapshot(user).await.unwrap().state
    }

    fn text(value: &str) -> UserInput {
        UserInput::Text(value.to_string())
    }

    fn choice(value: &str) -> UserInput {
        UserInput::Choice(value.to_string())
    }

    /// Scenario: start -> city -> category -> browse three events.
    #[tokio::test]
    async fn full_forward_flow() {
        let search = MockSearchClient::new();
        search.queue_results(vec![raw("Первое"), raw("Второе"), raw("Третье")]);
        let engine = engine_with(search);

        let replies = engine
            .handle("u1", UserInput::Command(Command::Start))
            .await;
        assert_eq!(replies[0].text, WELCOME_TEXT);
        assert_eq!(replies[0].choices.len(), 3);
        assert_eq!(state_of(&engine, "u1").await, DialogState::AwaitingCity);

        engine.handle("u1", text("Москва")).await;
        assert_eq!(state_of(&engine, "u1").await, DialogState::AwaitingCategory);

        let replies = engine.handle("u1", text("🎵 Концерты")).await;
        assert_eq!(state_of(&engine, "u1").await, DialogState::BrowsingEvents);

        let session = engine.store().snapshot("u1").await.unwrap();
        assert_eq!(session.events.len(), 3);
        // 3 truncated event labels + back
        assert_eq!(replies[0].choices.len(), 4);
    }

    /// Scenario: search failure leaves the category step untouched.
    #[tokio::test]
    async fn search_failure_keeps_category_state() {
        let search = MockSearchClient::new();
        search.queue_error(SearchError::timeout("deadline exceeded"));
        let engine = engine_with(search);

        engine.handle("u1", text("Москва")).await;
        let replies = engine.handle("u1", text("🎵 Концерты")).await;

        assert_eq!(replies[0].text, SEARCH_UNAVAILABLE_TEXT);
        let session = engine.store().snapshot("u1").await.unwrap();
        assert_eq!(session.state, DialogState::AwaitingCategory);
        assert!(session.events.is_empty());
    }

    /// Scenario: untitled records are filtered before storage.
    #[tokio::test]
    async fn untitled_records_are_filtered() {
        let search = MockSearchClient::new();
        search.queue_results(vec![raw("Первое"), raw(""), raw("Третье")]);
        let engine = engine_with(search);

        engine.handle("u1", text("Москва")).await;
        engine.handle("u1", text("🎵 Концерты")).await;

        let session = engine.store().snapshot("u1").await.unwrap();
        assert_eq!(session.state, DialogState::BrowsingEvents);
        assert_eq!(session.events.len(), 2);
    }

    /// Scenario: a page of only-untitled records counts as nothing found.
    #[tokio::test]
    async fn all_filtered_page_counts_as_empty() {
        let search = MockSearchClient::new();
        search.queue_results(vec![raw(""), raw("   ")]);
        let engine = engine_with(search);

        engine.handle("u1", text("Москва")).await;
        let replies = engine.handle("u1", text("🎵 Концерты")).await;

        assert_eq!(replies[0].text, NOTHING_FOUND_TEXT);
        assert_eq!(state_of(&engine, "u1").await, DialogState::AwaitingCategory);
    }

    /// Scenario: browsing, then back clears the event list.
    #[tokio::test]
    async fn back_from_browsing_clears_events() {
        let search = MockSearchClient::new();
        search.queue_results(vec![raw("Первое"), raw("Второе")]);
        let engine = engine_with(search);

        engine.handle("u1", text("Москва")).await;
        engine.handle("u1", text("🎵 Концерты")).await;

        let detail = engine.handle("u1", choice("0")).await;
        assert!(detail[0].text.contains("Первое"));

        engine.handle("u1", choice("back")).await;
        let session = engine.store().snapshot("u1").await.unwrap();
        assert_eq!(session.state, DialogState::AwaitingCategory);
        assert!(session.events.is_empty());
    }

    /// Requested page size is forwarded to the search collaborator.
    #[tokio::test]
    async fn page_size_reaches_the_client() {
        let search = MockSearchClient::new();
        search.queue_results(vec![raw("Первое")]);
        let engine = DialogEngine::new(search, Catalogs::default(), 7);

        engine.handle("u1", text("Москва")).await;
        engine.handle("u1", text("🎵 Концерты")).await;

        let calls = engine.search.recorded_calls();
        assert_eq!(calls, vec![("msk".to_string(), "concert".to_string(), 7)]);
    }

    /// Two simultaneous turns for one user must apply in some serial order.
    #[tokio::test]
    async fn concurrent_same_user_turns_are_serialized() {
        let search = MockSearchClient::new().with_delay(Duration::from_millis(100));
        search.queue_results(vec![raw("Первое")]);
        let engine = Arc::new(engine_with(search));

        // Reach AwaitingCategory first
        engine.handle("u1", text("Москва")).await;

        // Turn A triggers a slow search; turn B presses back
        let a = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.handle("u1", text("🎵 Концерты")).await })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.handle("u1", choice("back")).await })
        };
        let (a, b) = tokio::join!(a, b);
        a.unwrap();
        b.unwrap();

        let session = engine.store().snapshot("u1").await.unwrap();
        assert!(session.invariants_hold(), "merged state: {session:?}");

        // Either order is legal; a merged/partial state is not.
        let a_then_b = session.state == DialogState::AwaitingCategory
            && session.city.as_deref() == Some("Москва")
            && session.events.is_empty();
        let b_then_a =
            session.state == DialogState::AwaitingCity && session.city.is_none();
        assert!(
            a_then_b || b_then_a,
            "state is not a serial outcome: {session:?}"
        );
    }

    /// Distinct users are not serialized against each other.
    #[tokio::test]
    async fn distinct_users_run_concurrently() {
        let search = MockSearchClient::new();
        let engine = Arc::new(engine_with(search));

        let a = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.handle("u1", text("Москва")).await })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.handle("u2", text("Казань")).await })
        };
        let (a, b) = tokio::join!(a, b);
        a.unwrap();
        b.unwrap();

        assert_eq!(state_of(&engine, "u1").await, DialogState::AwaitingCategory);
        assert_eq!(state_of(&engine, "u2").await, DialogState::AwaitingCategory);
    }
}
