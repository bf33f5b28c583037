//! Chat Routes
//!
//! - POST /api/chat — react to the child's latest message
//! - POST /api/chat-summary — summarize a chat history
//!
//! History lives on the client and is supplied whole with every request.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::Result;
use crate::llm::ChatTurn;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat-summary", post(chat_summary))
}

/// Parse the caller's history array. A history that is missing, not an
/// array, or containing unreadable items degrades to fewer (or zero) turns
/// rather than an error.
fn parse_history(value: Option<&Value>) -> Vec<ChatTurn> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// POST /api/chat
async fn chat(State(state): State<AppState>, Json(payload): Json<Value>) -> Result<Json<Value>> {
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let history = parse_history(payload.get("history"));

    let reply = state.llm().chat_reaction(message, &history).await?;
    Ok(Json(json!({ "reply": reply })))
}

/// POST /api/chat-summary
async fn chat_summary(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    let history = parse_history(payload.get("history"));

    let summary = state.llm().summarize_history(&history).await?;
    Ok(Json(json!({ "summary": summary })))
}
