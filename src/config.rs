//! Process configuration from environment variables

use crate::search::DEFAULT_PAGE_SIZE;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 3;

/// Bot configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Port for the webhook server
    pub port: u16,
    /// Override for the events API base URL (tests, proxies)
    pub kudago_base_url: Option<String>,
    /// Page size requested per search (clamped downstream)
    pub page_size: usize,
    /// Timeout budget for one search request
    pub search_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            kudago_base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("AFISHA_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            kudago_base_url: std::env::var("KUDAGO_API_URL").ok(),
            page_size: std::env::var("KUDAGO_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_size),
            search_timeout: std::env::var("KUDAGO_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.search_timeout),
        }
    }
}
