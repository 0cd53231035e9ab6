//! Test utilities for fine-core
//!
//! This module provides a mock assistant server that speaks both the Ollama
//! chat API and the OpenAI-compatible chat completions API. It records every
//! chat request so tests can inspect the context that was sent.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct MockState {
    failing: bool,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Mock assistant server for testing and development
pub struct MockAssistantServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAssistantServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockState::default()).await
    }

    /// Start a server whose chat endpoints always answer 500
    pub async fn start_failing() -> Self {
        Self::start_with(MockState {
            failing: true,
            ..Default::default()
        })
        .await
    }

    async fn start_with(state: MockState) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/chat", post(handle_ollama_chat))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAssistantServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reply text: echoes the last user message
pub fn mock_reply(body: &Value) -> String {
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let last_user = messages
        .iter()
        .rev()
        .find(|m| m["role"] == "user")
        .and_then(|m| m["content"].as_str())
        .unwrap_or("");
    format!("Mock assistant ({} messages): {}", messages.len(), last_user)
}

async fn handle_tags() -> Json<Value> {
    Json(json!({
        "models": [{
            "name": "llama3.2:latest",
            "modified_at": "2024-01-01T00:00:00Z",
            "size": 4_000_000_000u64
        }]
    }))
}

async fn handle_models() -> Json<Value> {
    Json(json!({ "data": [{ "id": "mock-model", "object": "model" }] }))
}

async fn handle_ollama_chat(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body.clone());
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response();
    }

    Json(json!({
        "model": body["model"],
        "message": { "role": "assistant", "content": mock_reply(&body) },
        "done": true
    }))
    .into_response()
}

async fn handle_completions(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body.clone());
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": mock_reply(&body) },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
