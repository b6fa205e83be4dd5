//! Events search abstraction
//!
//! Provides a common interface for fetching event listings from an external
//! search provider. All failure modes are values; a search is attempted
//! exactly once per dialog transition (retry policy belongs to the caller).

mod kudago;

pub use kudago::KudagoClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Hard cap on results kept per search, regardless of what was requested.
pub const MAX_RESULTS: usize = 10;

/// Default page size requested from the provider.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Common interface for event search providers
#[async_trait]
pub trait EventSearch: Send + Sync {
    /// Fetch events for a city/category pair. `page_size` is clamped to
    /// `1..=MAX_RESULTS` before the request goes out.
    async fn search(
        &self,
        city_code: &str,
        category_code: &str,
        page_size: usize,
    ) -> Result<Vec<RawEvent>, SearchError>;
}

#[async_trait]
impl<T: EventSearch + ?Sized> EventSearch for std::sync::Arc<T> {
    async fn search(
        &self,
        city_code: &str,
        category_code: &str,
        page_size: usize,
    ) -> Result<Vec<RawEvent>, SearchError> {
        (**self).search(city_code, category_code, page_size).await
    }
}

/// Search error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SearchError {
    pub kind: SearchErrorKind,
    pub message: String,
}

impl SearchError {
    pub fn new(kind: SearchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SearchErrorKind::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SearchErrorKind::RateLimited, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(SearchErrorKind::ServerError, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(SearchErrorKind::Unreachable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SearchErrorKind::Malformed, message)
    }
}

/// Failure classification for the search collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    /// Request exceeded the client timeout budget
    Timeout,
    /// Provider rate limit (429)
    RateLimited,
    /// Provider-side failure (5xx)
    ServerError,
    /// Connection failed or other transport problem
    Unreachable,
    /// Response did not parse as expected
    Malformed,
}

/// Unprocessed event record from the search provider.
///
/// Only `title` is reliably present (and may still be empty, in which case
/// the formatter discards the record); every other field must be treated as
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub place: Option<RawPlace>,
    #[serde(default)]
    pub dates: Vec<RawDate>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDate {
    /// Unix timestamp in seconds, UTC
    #[serde(default)]
    pub start: Option<i64>,
}

impl RawEvent {
    /// First start timestamp, if the provider supplied any.
    pub fn start_timestamp(&self) -> Option<i64> {
        self.dates.iter().find_map(|d| d.start)
    }
}
