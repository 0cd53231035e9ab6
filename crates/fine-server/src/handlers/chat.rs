//! Assistant chat handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::{get_owner, AppError, AppState};
use fine_core::ChatTurn;

/// Request body for a chat turn
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Earlier turns, oldest first; only the most recent few are used
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

/// Assistant reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// True when the assistant could not be reached and `response` is the fallback
    pub degraded: bool,
}

/// POST /api/chatbot/chat - Answer a message with the owner's figures as context
pub async fn chat(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ChatResponse>, AppError> {
    let owner = get_owner(request.headers());
    let req: ChatRequest = read_json(request).await?;

    let reply = state
        .service
        .build_assistant_reply(&owner, &req.message, &req.conversation_history)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.reply,
        degraded: reply.degraded,
    }))
}
