//! Event formatting: raw API records into display-ready summaries

use crate::search::RawEvent;
use chrono::{DateTime, Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Maximum description length kept in a summary.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Maximum width of a choice-button label, including the marker.
pub const LABEL_WIDTH: usize = 25;

const TRUNCATION_MARKER: &str = "...";

/// Placeholder for a missing or unrepresentable start date.
pub const DATE_NOT_SPECIFIED: &str = "Дата не указана";

/// Month names in genitive case for date rendering.
const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Filtered, display-ready projection of a [`RawEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub title: String,
    pub venue: Option<String>,
    pub address: Option<String>,
    /// Always present: the placeholder stands in for a missing timestamp.
    pub date_text: String,
    pub price: Option<String>,
    pub ticket_url: Option<String>,
    pub description: Option<String>,
    /// Whether the record carries anything beyond the basic summary.
    pub has_more_info: bool,
}

impl EventSummary {
    /// Choice-button label, truncated to the transport's display width.
    pub fn label(&self) -> String {
        shorten_label(&self.title)
    }

    /// Multi-line detail text for the event view.
    pub fn detail_text(&self) -> String {
        let mut text = format!("🎤 {}\n", self.title);

        if let Some(venue) = &self.venue {
            text.push_str(&format!("\n🏠 Место: {venue}"));
        }
        if let Some(address) = &self.address {
            text.push_str(&format!("\n📍 Адрес: {address}"));
        }
        text.push_str(&format!("\n📅 Дата: {}", self.date_text));
        if let Some(price) = &self.price {
            text.push_str(&format!("\n💵 Цена: {price}"));
        }
        if let Some(description) = &self.description {
            text.push_str(&format!("\n\nℹ️ Описание:\n{description}"));
        }

        text
    }
}

/// Project a raw record into a summary, or discard it.
///
/// Records without a usable title are invalid and dropped; every other
/// field degrades to absence.
pub fn summarize(raw: &RawEvent) -> Option<EventSummary> {
    let title = raw.title.trim();
    if title.is_empty() {
        return None;
    }

    let venue = raw.place.as_ref().and_then(|p| non_empty(p.name.as_deref()));
    let address = raw
        .place
        .as_ref()
        .and_then(|p| non_empty(p.address.as_deref()));
    let price = non_empty(raw.price.as_deref());
    let ticket_url = non_empty(raw.site_url.as_deref());
    let description = non_empty(raw.description.as_deref())
        .map(|d| truncate_chars(&d, DESCRIPTION_LIMIT, "…"));

    Some(EventSummary {
        title: title.to_string(),
        venue,
        address,
        date_text: format_start_date(raw.start_timestamp()),
        price,
        has_more_info: description.is_some() || ticket_url.is_some(),
        ticket_url,
        description,
    })
}

/// Render a Unix timestamp (seconds, UTC) as a human date, falling back to
/// the placeholder when missing or out of range. Never fails.
pub fn format_start_date(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp else {
        return DATE_NOT_SPECIFIED.to_string();
    };
    let Some(dt) = DateTime::from_timestamp(ts, 0) else {
        return DATE_NOT_SPECIFIED.to_string();
    };

    let month = MONTHS[dt.month0() as usize];
    format!(
        "{} {month} {}, {}:{:02}",
        dt.day(),
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// Shorten text to the choice-button width, marking truncation.
pub fn shorten_label(text: &str) -> String {
    if text.chars().count() <= LABEL_WIDTH {
        return text.to_string();
    }
    let kept: String = text
        .chars()
        .take(LABEL_WIDTH - TRUNCATION_MARKER.chars().count())
        .collect();
    format!("{kept}{TRUNCATION_MARKER}")
}

/// Char-boundary-safe truncation with a marker appended when cut.
fn truncate_chars(text: &str, max: usize, marker: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max).collect();
    format!("{kept}{marker}")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
