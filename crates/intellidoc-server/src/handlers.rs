use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use intellidoc_engine::ConversationTurn;

use crate::server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// `history` is `[user, assistant]` pairs, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub history: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub history: Vec<(String, String)>,
}

fn pairs(turns: &[ConversationTurn]) -> Vec<(String, String)> {
    turns
        .iter()
        .map(|t| (t.user.clone(), t.assistant.clone()))
        .collect()
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(json!({
        "status": "healthy",
        "turns": session.turns().len(),
    }))
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "message must not be empty" })),
        )
            .into_response();
    }

    // One question at a time; the transcript is shared by every client.
    let mut session = state.session.lock().await;
    let answer = session.ask(message).await;
    tracing::debug!(turns = session.turns().len(), "chat request served");

    Json(ChatResponse {
        answer,
        history: pairs(session.turns()),
    })
    .into_response()
}

pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.session.lock().await.clear();
    tracing::info!("chat history cleared");
    Json(ClearResponse {
        history: Vec::new(),
    })
}
