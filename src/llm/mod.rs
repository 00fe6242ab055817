pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::chat::ChatMessage;

/// Failure of an upstream chat call, already classified into the small closed
/// set the endpoint reports on. Classification happens inside the provider
/// client, from structured error codes where available.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("credential rejected by provider: {0}")]
    Credential(String),
    #[error("provider quota exceeded: {0}")]
    RateLimit(String),
    #[error("network failure reaching provider: {0}")]
    Connectivity(String),
    #[error("provider error: {0}")]
    Upstream(String),
}

impl ChatError {
    pub fn details(&self) -> &str {
        match self {
            ChatError::Credential(d)
            | ChatError::RateLimit(d)
            | ChatError::Connectivity(d)
            | ChatError::Upstream(d) => d,
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends `message` as the next turn of a conversation seeded with
    /// `history`, and returns the model's textual reply.
    async fn chat(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError>;

    fn model(&self) -> &str;
}

/// Last-resort classification of an opaque provider error by text inspection.
/// Structured status codes take precedence; this only runs when none matched.
pub fn classify_error_text(details: &str) -> ChatError {
    let lowered = details.to_lowercase();
    if lowered.contains("api key") {
        ChatError::Credential(details.to_string())
    } else if lowered.contains("quota") {
        ChatError::RateLimit(details.to_string())
    } else if lowered.contains("network") {
        ChatError::Connectivity(details.to_string())
    } else {
        ChatError::Upstream(details.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fallback_matches_known_phrases() {
        assert!(matches!(
            classify_error_text("API key not valid. Please pass a valid API key."),
            ChatError::Credential(_)
        ));
        assert!(matches!(
            classify_error_text("Quota exceeded for requests per minute"),
            ChatError::RateLimit(_)
        ));
        assert!(matches!(
            classify_error_text("network unreachable"),
            ChatError::Connectivity(_)
        ));
        assert!(matches!(
            classify_error_text("something else entirely"),
            ChatError::Upstream(_)
        ));
    }
}
