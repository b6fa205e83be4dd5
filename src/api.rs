//! Webhook HTTP surface
//!
//! The transport delivers one tagged inbound event per user turn and gets
//! back a list of render instructions. How those become keyboards, buttons
//! or cards is the transport's business.

use crate::dialog::{Command, DialogEngine, Reply, UserInput};
use crate::search::EventSearch;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One inbound user turn.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    pub user_id: String,
    pub kind: InboundKind,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundKind {
    Text,
    Choice,
    Command,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub replies: Vec<Reply>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Create the webhook router.
pub fn create_router<S: EventSearch + 'static>(engine: Arc<DialogEngine<S>>) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook::<S>))
        .route("/healthz", get(healthz))
        .with_state(engine)
}

async fn handle_webhook<S: EventSearch + 'static>(
    State(engine): State<Arc<DialogEngine<S>>>,
    Json(inbound): Json<InboundEvent>,
) -> Response {
    let input = match to_user_input(&inbound) {
        Ok(input) => input,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
                .into_response();
        }
    };

    let replies = engine.handle(&inbound.user_id, input).await;
    Json(WebhookResponse { replies }).into_response()
}

fn to_user_input(inbound: &InboundEvent) -> Result<UserInput, String> {
    match inbound.kind {
        InboundKind::Text => Ok(UserInput::Text(inbound.payload.clone())),
        InboundKind::Choice => Ok(UserInput::Choice(inbound.payload.clone())),
        InboundKind::Command => Command::parse(&inbound.payload)
            .map(UserInput::Command)
            .ok_or_else(|| format!("unknown command: {}", inbound.payload)),
    }
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
