use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Message, MessageRole};

/// Title given to a chat before its first exchange
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 50;

/// One conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    /// Opaque unique id
    #[serde(deserialize_with = "super::deserialize_id")]
    pub id: String,
    /// Title derived from the first user message
    #[serde(default = "default_title")]
    pub title: String,
    /// Messages in conversation order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// When the chat was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_title() -> String {
    DEFAULT_CHAT_TITLE.to_string()
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

impl Chat {
    /// Create an empty chat with the default title
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: default_title(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether no exchange has happened yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get a message by id
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// Get a message by id (mutable)
    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    /// The most recent user message, if any
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
    }

    /// The assistant message currently being streamed, if any
    pub fn streaming_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_streaming())
    }
}

/// Derive a chat title from the first user message.
///
/// Truncates to [`MAX_TITLE_CHARS`] characters without splitting a UTF-8 sequence.
pub fn title_from_message(text: &str) -> String {
    match text.char_indices().nth(MAX_TITLE_CHARS) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
