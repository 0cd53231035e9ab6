//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod chat;
pub mod dashboard;
pub mod goals;
pub mod insights;
pub mod limits;
pub mod profile;
pub mod transactions;

// Re-export all handlers for use in router
pub use chat::*;
pub use dashboard::*;
pub use goals::*;
pub use insights::*;
pub use limits::*;
pub use profile::*;
pub use transactions::*;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{AppError, AppState, MAX_BODY_SIZE};
use fine_core::AssistantStatus;

/// Read and parse a required JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = body_bytes(request).await?;
    if bytes.is_empty() {
        return Err(AppError::bad_request("Request body is required"));
    }
    parse_json(&bytes)
}

/// Read a JSON request body; an empty body yields `T::default()`
pub(crate) async fn read_json_or_default<T>(request: Request) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    let bytes = body_bytes(request).await?;
    if bytes.is_empty() {
        return Ok(T::default());
    }
    parse_json(&bytes)
}

async fn body_bytes(request: Request) -> Result<axum::body::Bytes, AppError> {
    axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(bytes).map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// GET /api - Service banner
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "FINE API - Finance Intelligent Ecosystem"
    }))
}

/// Response for the health endpoint
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub assistant: AssistantStatus,
}

/// GET /api/health - Liveness and assistant availability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        assistant: state.service.assistant_status().await,
    })
}
