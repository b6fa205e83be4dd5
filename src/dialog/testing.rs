//! Mock search client for engine tests

use crate::search::{EventSearch, RawEvent, SearchError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Mock events search that returns queued outcomes and records calls.
pub struct MockSearchClient {
    responses: Mutex<VecDeque<Result<Vec<RawEvent>, SearchError>>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String, usize)>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every call, for forcing overlap in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_results(&self, events: Vec<RawEvent>) {
        self.responses.lock().unwrap().push_back(Ok(events));
    }

    pub fn queue_error(&self, error: SearchError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_calls(&self) -> Vec<(String, String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSearch for MockSearchClient {
    async fn search(
        &self,
        city_code: &str,
        category_code: &str,
        page_size: usize,
    ) -> Result<Vec<RawEvent>, SearchError> {
        self.calls.lock().unwrap().push((
            city_code.to_string(),
            category_code.to_string(),
            page_size,
        ));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SearchError::unreachable("no mock response queued")))
    }
}
