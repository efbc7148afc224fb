//! In-memory conversation store.

use crate::models::{title_from_message, Artifact, Chat, Message, MessageRole};

/// Ordered chat collection plus the active chat id.
///
/// Chats are kept most-recently-created first. The collection is never empty
/// and `active_id` always names a chat in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStore {
    chats: Vec<Chat>,
    active_id: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// A store holding a single fresh chat, made active.
    pub fn new() -> Self {
        let chat = Chat::new();
        Self {
            active_id: chat.id.clone(),
            chats: vec![chat],
        }
    }

    /// Rebuild from a persisted snapshot.
    ///
    /// Falls back to a fresh store when there is no snapshot or it holds no
    /// chats. A missing or dangling active id selects the first chat. Replies
    /// that were still streaming when the snapshot was taken are marked aborted.
    pub fn from_snapshot(chats: Option<Vec<Chat>>, active_id: Option<String>) -> Self {
        let Some(mut chats) = chats.filter(|c| !c.is_empty()) else {
            return Self::new();
        };

        let mut interrupted = 0usize;
        for message in chats.iter_mut().flat_map(|c| c.messages.iter_mut()) {
            if message.is_streaming() {
                message.abort();
                interrupted += 1;
            }
        }
        if interrupted > 0 {
            tracing::info!(interrupted, "Marked interrupted replies from last run as aborted");
        }

        let active_id = match active_id {
            Some(id) if chats.iter().any(|c| c.id == id) => id,
            _ => chats[0].id.clone(),
        };

        Self { chats, active_id }
    }

    /// All chats, most recent first.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Number of chats.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    /// Total messages across all chats.
    pub fn message_count(&self) -> usize {
        self.chats.iter().map(|c| c.messages.len()).sum()
    }

    /// Get a chat by id.
    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    fn chat_mut(&mut self, id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == id)
    }

    /// Id of the active chat.
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active chat.
    pub fn active(&self) -> &Chat {
        let index = self
            .chats
            .iter()
            .position(|c| c.id == self.active_id)
            .unwrap_or(0);
        &self.chats[index]
    }

    /// Make an existing chat active. Returns false for unknown ids.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.chat(id).is_none() {
            return false;
        }
        self.active_id = id.to_string();
        true
    }

    /// Insert a chat at the front and make it active. Returns its id.
    pub fn insert_front(&mut self, chat: Chat) -> String {
        let id = chat.id.clone();
        self.chats.insert(0, chat);
        self.active_id = id.clone();
        id
    }

    /// Replace every chat with a single fresh one, made active. Returns its id.
    pub fn reset(&mut self) -> String {
        let chat = Chat::new();
        let id = chat.id.clone();
        // Build the replacement first so the active id never dangles
        self.chats = vec![chat];
        self.active_id = id.clone();
        id
    }

    /// Append a user message and a streaming assistant placeholder to a chat.
    ///
    /// Sets the title from `text` on the chat's first exchange. Returns the
    /// placeholder's id, or `None` if the chat does not exist.
    pub fn begin_exchange(&mut self, chat_id: &str, text: &str) -> Option<String> {
        let chat = self.chat_mut(chat_id)?;
        if chat.messages.is_empty() {
            chat.title = title_from_message(text);
        }
        chat.messages.push(Message::user(text));

        let placeholder = Message::assistant_placeholder();
        let message_id = placeholder.id.clone();
        chat.messages.push(placeholder);
        Some(message_id)
    }

    /// Drop a chat's trailing assistant reply and open a fresh placeholder after
    /// the user message it answered.
    ///
    /// Returns the prompt (that user message's content) and the new
    /// placeholder's id. Returns `None`, changing nothing, when the chat has
    /// fewer than two messages, is still streaming, or does not end in a
    /// user/assistant pair.
    pub fn begin_regeneration(&mut self, chat_id: &str) -> Option<(String, String)> {
        let chat = self.chat_mut(chat_id)?;
        let len = chat.messages.len();
        if len < 2 {
            return None;
        }
        let (prompt_msg, reply) = (&chat.messages[len - 2], &chat.messages[len - 1]);
        if prompt_msg.role != MessageRole::User
            || reply.role != MessageRole::Assistant
            || reply.is_streaming()
        {
            return None;
        }

        let prompt = prompt_msg.content.clone();
        chat.messages.pop();

        let placeholder = Message::assistant_placeholder();
        let message_id = placeholder.id.clone();
        chat.messages.push(placeholder);
        Some((prompt, message_id))
    }

    /// Append a fragment to a streaming message. Returns false if the message
    /// is gone or no longer streaming.
    pub fn append_fragment(&mut self, chat_id: &str, message_id: &str, fragment: &str) -> bool {
        self.message_mut(chat_id, message_id)
            .map(|m| m.append_fragment(fragment))
            .unwrap_or(false)
    }

    /// Finish a streaming message, attaching `artifact` if given.
    pub fn finish_message(
        &mut self,
        chat_id: &str,
        message_id: &str,
        artifact: Option<Artifact>,
    ) -> bool {
        let Some(message) = self.message_mut(chat_id, message_id) else {
            return false;
        };
        if !message.is_streaming() {
            return false;
        }
        message.finalize();
        if artifact.is_some() {
            message.artifact = artifact;
        }
        true
    }

    /// Mark a streaming message as failed.
    pub fn fail_message(&mut self, chat_id: &str, message_id: &str, error: &str) -> bool {
        let Some(message) = self.message_mut(chat_id, message_id) else {
            return false;
        };
        if !message.is_streaming() {
            return false;
        }
        message.fail(error);
        true
    }

    /// Mark a streaming message as aborted.
    pub fn abort_message(&mut self, chat_id: &str, message_id: &str) -> bool {
        let Some(message) = self.message_mut(chat_id, message_id) else {
            return false;
        };
        if !message.is_streaming() {
            return false;
        }
        message.abort();
        true
    }

    fn message_mut(&mut self, chat_id: &str, message_id: &str) -> Option<&mut Message> {
        self.chat_mut(chat_id)?.message_mut(message_id)
    }
}
