mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use thiserror::Error;

use crate::models::chat::{ Chat, ChatMessage };

const CHATS_KEY: &str = "thunder-chats";
const THEME_KEY: &str = "thunder-theme";
const DEFAULT_THEME: &str = "dark";
const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable key-value persistence behind the conversation store. Values are
/// opaque strings; the store encodes JSON into them.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Title is a pure function of the first message: its first 30 characters,
/// with no word-boundary awareness. Empty history (or empty content) falls
/// back to "New Chat".
pub fn derive_title(history: &[ChatMessage]) -> String {
    let title: String = history
        .first()
        .map(|m| m.content.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_default();
    if title.is_empty() {
        "New Chat".to_string()
    } else {
        title
    }
}

/// Owns the chat collection, the active chat and its in-memory history.
/// After any completed mutation the persisted collection matches the
/// in-memory one; `append_message` alone never touches storage.
pub struct ChatStore<B: StorageBackend> {
    backend: B,
    chats: HashMap<String, Chat>,
    active_id: Option<String>,
    history: Vec<ChatMessage>,
}

impl<B: StorageBackend> ChatStore<B> {
    /// Loads the persisted collection, or starts empty when none exists.
    pub async fn open(backend: B) -> Result<Self, StoreError> {
        let chats = match backend.get(CHATS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => HashMap::new(),
        };
        Ok(Self {
            backend,
            chats,
            active_id: None,
            history: Vec::new(),
        })
    }

    /// Starts a fresh chat: time-derived unique id, empty history, active.
    /// Nothing is persisted until the first save.
    pub fn create_chat(&mut self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.chats.contains_key(&candidate.to_string()) {
            candidate += 1;
        }
        let id = candidate.to_string();
        self.active_id = Some(id.clone());
        self.history.clear();
        id
    }

    /// Appends to the active in-memory history only.
    pub fn append_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    /// Writes the active chat into the collection and persists the whole
    /// collection. No-op when no chat is active.
    pub async fn save_active_chat(&mut self) -> Result<(), StoreError> {
        let Some(id) = self.active_id.clone() else {
            return Ok(());
        };
        let chat = Chat {
            id: id.clone(),
            title: derive_title(&self.history),
            history: self.history.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };
        self.chats.insert(id.clone(), chat);
        let raw = serde_json::to_string(&self.chats)?;
        self.backend.put(CHATS_KEY, &raw).await?;
        debug!("saved chat {} ({} messages)", id, self.history.len());
        Ok(())
    }

    /// Makes the given chat active and replaces the in-memory history with
    /// its persisted copy. Silently no-ops on an unknown id.
    pub fn load_chat(&mut self, id: &str) {
        if let Some(chat) = self.chats.get(id) {
            self.active_id = Some(id.to_string());
            self.history = chat.history.clone();
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Chats ordered by last-updated time, newest first.
    pub fn chat_list(&self) -> Vec<&Chat> {
        let mut list: Vec<&Chat> = self.chats.values().collect();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        list
    }

    pub async fn theme(&self) -> Result<String, StoreError> {
        Ok(self
            .backend
            .get(THEME_KEY)
            .await?
            .unwrap_or_else(|| DEFAULT_THEME.to_string()))
    }

    pub async fn set_theme(&self, theme: &str) -> Result<(), StoreError> {
        self.backend.put(THEME_KEY, theme).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> ChatStore<MemoryBackend> {
        ChatStore::open(MemoryBackend::new()).await.unwrap()
    }

    #[test]
    fn title_is_identity_up_to_thirty_chars() {
        let short = vec![ChatMessage::user("hello world")];
        assert_eq!(derive_title(&short), "hello world");

        let exact = vec![ChatMessage::user("a".repeat(30))];
        assert_eq!(derive_title(&exact), "a".repeat(30));

        let long = vec![ChatMessage::user(format!("{}tail", "b".repeat(30)))];
        assert_eq!(derive_title(&long), "b".repeat(30));

        assert_eq!(derive_title(&[]), "New Chat");
        assert_eq!(derive_title(&[ChatMessage::user("")]), "New Chat");
    }

    #[tokio::test]
    async fn save_then_load_round_trips_history() {
        let mut store = store().await;
        let id = store.create_chat();
        store.append_message(ChatMessage::user("question"));
        store.append_message(ChatMessage::assistant("answer"));
        store.save_active_chat().await.unwrap();

        // Switch away and back.
        store.create_chat();
        assert!(store.history().is_empty());
        store.load_chat(&id);
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0], ChatMessage::user("question"));
        assert_eq!(store.history()[1], ChatMessage::assistant("answer"));
    }

    #[tokio::test]
    async fn save_is_idempotent_without_new_messages() {
        let mut store = store().await;
        let id = store.create_chat();
        store.append_message(ChatMessage::user("only message"));
        store.save_active_chat().await.unwrap();
        let first = store.chats.get(&id).unwrap().clone();

        store.save_active_chat().await.unwrap();
        let second = store.chats.get(&id).unwrap();
        assert_eq!(first.title, second.title);
        assert_eq!(first.history, second.history);
    }

    #[tokio::test]
    async fn save_without_active_chat_is_a_noop() {
        let mut store = store().await;
        store.append_message(ChatMessage::user("floating"));
        store.save_active_chat().await.unwrap();
        assert!(store.chat_list().is_empty());
    }

    #[tokio::test]
    async fn load_unknown_id_keeps_current_state() {
        let mut store = store().await;
        let id = store.create_chat();
        store.append_message(ChatMessage::user("kept"));
        store.load_chat("does-not-exist");
        assert_eq!(store.active_id(), Some(id.as_str()));
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn chat_list_orders_newest_first() {
        let mut store = store().await;
        let first = store.create_chat();
        store.append_message(ChatMessage::user("one"));
        store.save_active_chat().await.unwrap();

        let second = store.create_chat();
        store.append_message(ChatMessage::user("two"));
        store.save_active_chat().await.unwrap();

        // Force distinct timestamps.
        if let Some(chat) = store.chats.get_mut(&first) {
            chat.timestamp -= 1000;
        }

        let list = store.chat_list();
        assert_eq!(list[0].id, second);
        assert_eq!(list[1].id, first);
    }

    #[tokio::test]
    async fn theme_defaults_to_dark() {
        let store = store().await;
        assert_eq!(store.theme().await.unwrap(), "dark");
        store.set_theme("light").await.unwrap();
        assert_eq!(store.theme().await.unwrap(), "light");
    }

    #[tokio::test]
    async fn collection_survives_reopen() {
        let backend = MemoryBackend::new();
        let id;
        {
            let mut store = ChatStore::open(backend.clone()).await.unwrap();
            id = store.create_chat();
            store.append_message(ChatMessage::user("persisted"));
            store.save_active_chat().await.unwrap();
        }
        let mut reopened = ChatStore::open(backend).await.unwrap();
        reopened.load_chat(&id);
        assert_eq!(reopened.history().len(), 1);
        assert_eq!(reopened.history()[0].content, "persisted");
    }
}
