//! Mock backend for testing
//!
//! Useful for unit tests and development without a running model server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{AssistantRequest, ChatRole};
use super::AIBackend;

/// Mock assistant backend
///
/// Replies deterministically by echoing the last user message. Can be made
/// unhealthy (health check fails) or failing (every chat call errors).
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether chat should return an error
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            failing: false,
        }
    }

    /// Create a backend whose chat calls always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn chat(&self, request: &AssistantRequest) -> Result<String> {
        if self.failing {
            return Err(Error::Assistant("mock backend configured to fail".into()));
        }

        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        Ok(format!(
            "Mock reply ({} messages): {}",
            request.messages.len(),
            last_user
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatTurn;
    use crate::config::AssistantSettings;

    fn request(text: &str) -> AssistantRequest {
        AssistantRequest::new(
            vec![ChatTurn::system("You help"), ChatTurn::user(text)],
            &AssistantSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_echoes_last_user_message() {
        let reply = MockBackend::new().chat(&request("hi")).await.unwrap();
        assert_eq!(reply, "Mock reply (2 messages): hi");
    }

    #[tokio::test]
    async fn test_failing_backend_errors() {
        let backend = MockBackend::failing();
        assert!(backend.chat(&request("hi")).await.is_err());
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_unhealthy_still_chats() {
        let backend = MockBackend::unhealthy();
        assert!(!backend.health_check().await);
        assert!(backend.chat(&request("hi")).await.is_ok());
    }
}
