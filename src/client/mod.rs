use std::time::Duration;

use log::warn;
use thiserror::Error;

use crate::models::api::{ ChatRequest, ChatResponse, ErrorResponse };
use crate::models::chat::ChatMessage;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached at all (connect failure or timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with an error; carries its `error` field verbatim.
    #[error("{0}")]
    Server(String),
    #[error("invalid backend response: {0}")]
    Decode(String),
}

/// Shapes the wire request from a candidate message and the stored history.
/// Pure: trims the message, refuses empty-after-trim input, preserves history
/// order. Returns `None` when there is nothing to send.
pub fn build_chat_request(message: &str, history: &[ChatMessage]) -> Option<ChatRequest> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ChatRequest {
        message: trimmed.to_string(),
        history: history.to_vec(),
    })
}

/// HTTP client for the proxy backend. One outstanding call per send; no
/// retries. A failed send surfaces the server's error text unchanged.
pub struct ChatApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ChatApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Sends a built request and returns the assistant's reply text.
    pub async fn send(&self, request: &ChatRequest) -> Result<String, ClientError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = match resp.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => "Failed to get response".to_string(),
            };
            warn!("chat request failed ({}): {}", status, message);
            return Err(ClientError::Server(message));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_trims_and_rejects_empty() {
        assert!(build_chat_request("", &[]).is_none());
        assert!(build_chat_request("   \n\t", &[]).is_none());

        let req = build_chat_request("  hi there  ", &[]).unwrap();
        assert_eq!(req.message, "hi there");
        assert!(req.history.is_empty());
    }

    #[test]
    fn builder_carries_history_in_order() {
        let history = vec![
            ChatMessage::user("a"),
            ChatMessage::assistant("b"),
            ChatMessage::user("c"),
        ];
        let req = build_chat_request("next", &history).unwrap();
        assert_eq!(req.history, history);
    }
}
