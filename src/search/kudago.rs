//! KudaGo events API client

use super::{EventSearch, RawEvent, SearchError, MAX_RESULTS};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://kudago.com/public-api/v1.4";

/// Fields requested from the API; keeps payloads small.
const EVENT_FIELDS: &str = "title,place,price,dates,site_url,description";

/// KudaGo search client
pub struct KudagoClient {
    client: Client,
    base_url: String,
}

impl KudagoClient {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::unreachable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn classify_error(&self, status: reqwest::StatusCode, body: &str) -> SearchError {
        match status.as_u16() {
            429 => SearchError::rate_limited(format!("Rate limited: {body}")),
            500..=599 => SearchError::server_error(format!("Server error {status}: {body}")),
            _ => SearchError::server_error(format!("HTTP {status}: {body}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    results: Vec<RawEvent>,
}

#[async_trait]
impl EventSearch for KudagoClient {
    async fn search(
        &self,
        city_code: &str,
        category_code: &str,
        page_size: usize,
    ) -> Result<Vec<RawEvent>, SearchError> {
        let page_size = page_size.clamp(1, MAX_RESULTS);
        let url = format!("{}/events/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", city_code),
                ("categories", category_code),
                ("page_size", &page_size.to_string()),
                ("fields", EVENT_FIELDS),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    SearchError::unreachable(format!("Connection failed: {e}"))
                } else {
                    SearchError::unreachable(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::unreachable(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(self.classify_error(status, &body));
        }

        let page: EventsPage = serde_json::from_str(&body)
            .map_err(|e| SearchError::malformed(format!("Failed to parse response: {e}")))?;

        Ok(page.results)
    }
}
