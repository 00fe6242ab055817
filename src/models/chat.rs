use serde::{ Serialize, Deserialize };

/// One turn of a conversation as the application stores it. Roles are
/// `"user"` or `"assistant"`; anything else is treated as a user turn when
/// the history is replayed upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// A persisted chat: time-derived id, title derived from the first message,
/// append-only history, last-updated time in epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub history: Vec<ChatMessage>,
    pub timestamp: i64,
}
