//! Transport-agnostic render instructions
//!
//! The engine emits [`Reply`] values; the transport decides how to turn
//! them into its native UI (keyboard, inline buttons, cards).

use super::event::BACK_VALUE;
use crate::catalog::Catalog;
use crate::format::EventSummary;
use serde::Serialize;

/// A selectable choice: display label plus the opaque value sent back on
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// A button that opens an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// One outbound message: text plus optional choice and link rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_buttons: Vec<LinkButton>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: vec![],
            link_buttons: vec![],
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.link_buttons.push(LinkButton {
            label: label.into(),
            url: url.into(),
        });
        self
    }
}

fn back_choice() -> Choice {
    Choice {
        label: "🔙 Назад".to_string(),
        value: BACK_VALUE.to_string(),
    }
}

fn catalog_choices(catalog: &Catalog) -> Vec<Choice> {
    catalog
        .labels()
        .map(|label| Choice {
            label: label.to_string(),
            value: label.to_string(),
        })
        .collect()
}

/// Entry prompt for city selection.
pub fn city_prompt(text: impl Into<String>, cities: &Catalog) -> Reply {
    Reply::text(text).with_choices(catalog_choices(cities))
}

/// Entry prompt for category selection.
pub fn category_prompt(text: impl Into<String>, categories: &Catalog) -> Reply {
    let mut choices = catalog_choices(categories);
    choices.push(back_choice());
    Reply::text(text).with_choices(choices)
}

/// Entry prompt for event browsing: one truncated-label choice per event.
pub fn event_list_prompt(text: impl Into<String>, events: &[EventSummary]) -> Reply {
    let mut choices: Vec<Choice> = events
        .iter()
        .enumerate()
        .map(|(idx, event)| Choice {
            label: event.label(),
            value: idx.to_string(),
        })
        .collect();
    choices.push(back_choice());
    Reply::text(text).with_choices(choices)
}

/// Detail view for one event, with a ticket link when present.
pub fn event_detail(event: &EventSummary) -> Reply {
    let mut reply = Reply::text(event.detail_text());
    if let Some(url) = &event.ticket_url {
        reply = reply.with_link("🎟️ Купить билет", url);
    }
    reply
}
