use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Structured payload attached to an assistant reply (e.g. a code block)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    /// Kind tag, e.g. "code"
    #[serde(rename = "type")]
    pub kind: String,
    /// Body of the artifact
    pub code: String,
}

impl Artifact {
    /// Create a code artifact
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            kind: "code".to_string(),
            code: code.into(),
        }
    }
}

/// Lifecycle of a message's content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MessageStatus {
    /// Content is final
    #[default]
    Complete,
    /// Fragments are still being appended
    Streaming,
    /// The responder failed; content holds whatever arrived before the failure
    Failed { error: String },
    /// The turn was cancelled; content holds whatever arrived before the cancel
    Aborted,
}

/// One turn in a chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Opaque unique id
    #[serde(deserialize_with = "super::deserialize_id")]
    pub id: String,
    /// Role of the message author
    pub role: MessageRole,
    /// Text content; grows fragment by fragment while streaming
    pub content: String,
    /// Optional artifact, only ever set on assistant messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
    /// When the message was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Streaming state (older snapshots without it load as complete)
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    /// Create a finished user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            artifact: None,
            created_at: Utc::now(),
            status: MessageStatus::Complete,
        }
    }

    /// Create an empty assistant placeholder that is streaming
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: String::new(),
            artifact: None,
            created_at: Utc::now(),
            status: MessageStatus::Streaming,
        }
    }

    /// Whether fragments are still being appended
    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }

    /// Append a fragment during streaming. Ignored once the message is finished.
    pub fn append_fragment(&mut self, fragment: &str) -> bool {
        if !self.is_streaming() {
            return false;
        }
        self.content.push_str(fragment);
        true
    }

    /// Mark streaming as done
    pub fn finalize(&mut self) {
        if self.is_streaming() {
            self.status = MessageStatus::Complete;
        }
    }

    /// Mark the turn as failed, keeping partial content
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.is_streaming() {
            self.status = MessageStatus::Failed {
                error: error.into(),
            };
        }
    }

    /// Mark the turn as aborted, keeping partial content
    pub fn abort(&mut self) {
        if self.is_streaming() {
            self.status = MessageStatus::Aborted;
        }
    }
}
