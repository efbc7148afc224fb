//! Chat session orchestration.
//!
//! [`ChatSession`] owns the conversation store and is the only thing that
//! mutates it. Each send or regenerate spawns a driver task that pulls the
//! responder stream and forwards [`SessionEvent`]s over an unbounded channel;
//! the owner applies them with [`ChatSession::handle_event`]. A UI loop
//! typically does:
//!
//! ```no_run
//! # async fn run(mut session: chatloom::session::ChatSession) {
//! while let Some(event) = session.next_event().await {
//!     session.handle_event(event);
//! }
//! # }
//! ```

mod events;
mod store;
mod turn;

pub use events::{IgnoreReason, SendOutcome, SessionEvent, TurnId};
pub use store::ConversationStore;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clipboard::{Clipboard, ClipboardError, SystemClipboard};
use crate::models::{Chat, Message};
use crate::responder::StreamingResponder;
use crate::storage::{PersistenceStore, ACTIVE_ID_KEY, CHATS_KEY};
use turn::{spawn_driver, ActiveTurn};

/// The chat session: conversations, in-flight turns and their collaborators.
pub struct ChatSession {
    store: ConversationStore,
    persistence: PersistenceStore,
    responder: Arc<dyn StreamingResponder>,
    clipboard: Arc<dyn Clipboard>,
    /// In-flight turns keyed by chat id
    turns: HashMap<String, ActiveTurn>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("chats", &self.store.chat_count())
            .field("active_id", &self.store.active_id())
            .field("in_flight", &self.turns.len())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Restore the session from `persistence`, or start fresh if nothing
    /// usable is stored.
    pub fn restore(persistence: PersistenceStore, responder: Arc<dyn StreamingResponder>) -> Self {
        let chats: Option<Vec<Chat>> = persistence.load(CHATS_KEY);
        let active_id: Option<String> = persistence.load(ACTIVE_ID_KEY);
        let store = ConversationStore::from_snapshot(chats, active_id);
        tracing::info!(
            chats = store.chat_count(),
            messages = store.message_count(),
            "Session restored"
        );
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = Self {
            store,
            persistence,
            responder,
            clipboard: Arc::new(SystemClipboard),
            turns: HashMap::new(),
            event_tx,
            event_rx,
        };
        session.persist();
        session
    }

    /// Use `clipboard` for [`copy`](Self::copy) instead of the system clipboard.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn chats(&self) -> &[Chat] {
        self.store.chats()
    }

    pub fn active_id(&self) -> &str {
        self.store.active_id()
    }

    pub fn active_chat(&self) -> &Chat {
        self.store.active()
    }

    /// Whether a reply is streaming into `chat_id`.
    pub fn is_in_flight(&self, chat_id: &str) -> bool {
        self.turns.contains_key(chat_id)
    }

    /// Whether any chat has a reply streaming.
    pub fn has_turns_in_flight(&self) -> bool {
        !self.turns.is_empty()
    }

    /// Content of the last user message in the active chat.
    pub fn sticky_question(&self) -> Option<&str> {
        self.store
            .active()
            .last_user_message()
            .map(|m| m.content.as_str())
    }

    /// Create an empty chat at the front and make it active.
    pub fn new_chat(&mut self) -> String {
        let id = self.store.insert_front(Chat::new());
        tracing::debug!(chat_id = %id, "New chat");
        self.persist();
        id
    }

    /// Replace every chat with one fresh chat. In-flight turns are cancelled.
    pub fn clear_history(&mut self) -> String {
        for (_, turn) in self.turns.drain() {
            turn.cancel();
        }
        let id = self.store.reset();
        tracing::info!("Chat history cleared");
        self.persist();
        id
    }

    /// Make `chat_id` active. Unknown ids are ignored.
    pub fn select_chat(&mut self, chat_id: &str) -> bool {
        if !self.store.set_active(chat_id) {
            tracing::debug!(chat_id, "Ignoring selection of unknown chat");
            return false;
        }
        self.persist();
        true
    }

    /// Start a turn in the active chat without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin_send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let chat_id = self.store.active_id().to_string();
        if self.is_in_flight(&chat_id) {
            tracing::debug!(chat_id = %chat_id, "Send ignored while a reply is streaming");
            return SendOutcome::Ignored(IgnoreReason::InFlight);
        }

        let Some(message_id) = self.store.begin_exchange(&chat_id, text) else {
            // The active chat always exists
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        };
        self.persist();
        SendOutcome::Started(self.start_turn(chat_id, message_id, text))
    }

    /// Send `text` and wait for the reply to finish streaming.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let outcome = self.begin_send(text);
        if let SendOutcome::Started(turn) = &outcome {
            self.wait_for_turn(turn).await;
        }
        outcome
    }

    /// Replace the active chat's last reply with a fresh one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin_regenerate(&mut self) -> SendOutcome {
        let chat_id = self.store.active_id().to_string();
        if self.is_in_flight(&chat_id) {
            return SendOutcome::Ignored(IgnoreReason::InFlight);
        }
        let Some((prompt, message_id)) = self.store.begin_regeneration(&chat_id) else {
            return SendOutcome::Ignored(IgnoreReason::NothingToRegenerate);
        };
        tracing::debug!(chat_id = %chat_id, "Regenerating last reply");
        self.persist();
        SendOutcome::Started(self.start_turn(chat_id, message_id, &prompt))
    }

    /// Regenerate and wait for the new reply to finish streaming.
    pub async fn regenerate(&mut self) -> SendOutcome {
        let outcome = self.begin_regenerate();
        if let SendOutcome::Started(turn) = &outcome {
            self.wait_for_turn(turn).await;
        }
        outcome
    }

    /// Stop the turn streaming into `chat_id`. Content received so far is
    /// kept and the message is marked aborted.
    pub fn cancel(&mut self, chat_id: &str) -> bool {
        let Some(turn) = self.turns.remove(chat_id) else {
            return false;
        };
        turn.cancel();
        self.store.abort_message(chat_id, &turn.message_id);
        tracing::info!(chat_id, message_id = %turn.message_id, "Reply cancelled");
        self.persist();
        true
    }

    /// Write `content` to the clipboard.
    pub fn copy(&self, content: &str) -> Result<(), ClipboardError> {
        self.clipboard.write_text(content).map_err(|e| {
            tracing::warn!(error = %e, "Copy to clipboard failed");
            e
        })
    }

    /// Wait for the next event from any in-flight turn.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Apply a driver event. Returns false if the event was stale and dropped.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        let TurnId {
            chat_id,
            message_id,
        } = event.turn().clone();
        let current = self
            .turns
            .get(&chat_id)
            .is_some_and(|t| t.message_id == message_id);
        if !current {
            tracing::trace!(chat_id = %chat_id, message_id = %message_id, "Dropping stale event");
            return false;
        }

        match event {
            SessionEvent::Fragment { text, .. } => {
                self.store.append_fragment(&chat_id, &message_id, &text);
            }
            SessionEvent::Artifact { artifact, .. } => {
                if let Some(turn) = self.turns.get_mut(&chat_id) {
                    turn.artifact = Some(artifact);
                }
                return true;
            }
            SessionEvent::Completed { .. } => {
                let artifact = self.turns.remove(&chat_id).and_then(|t| t.artifact);
                self.store.finish_message(&chat_id, &message_id, artifact);
            }
            SessionEvent::Failed { error, .. } => {
                self.turns.remove(&chat_id);
                self.store
                    .fail_message(&chat_id, &message_id, &error.to_string());
            }
        }
        self.persist();
        true
    }

    /// Pump events until `turn` has ended.
    ///
    /// Events for other turns are applied along the way.
    pub async fn wait_for_turn(&mut self, turn: &TurnId) {
        while self
            .turns
            .get(&turn.chat_id)
            .is_some_and(|t| t.message_id == turn.message_id)
        {
            let Some(event) = self.event_rx.recv().await else {
                return;
            };
            self.handle_event(event);
        }
    }

    /// Find a message in the active chat.
    pub fn active_message(&self, message_id: &str) -> Option<&Message> {
        self.store.active().message(message_id)
    }

    fn start_turn(&mut self, chat_id: String, message_id: String, prompt: &str) -> TurnId {
        let turn = ActiveTurn::new(message_id.clone());
        let cancel = Arc::clone(&turn.cancel);
        self.turns.insert(chat_id.clone(), turn);

        let id = TurnId::new(chat_id, message_id);
        let stream = self.responder.respond(prompt);
        spawn_driver(stream, id.clone(), cancel, self.event_tx.clone());
        id
    }

    fn persist(&self) {
        self.persistence.save(CHATS_KEY, self.store.chats());
        self.persistence.save(ACTIVE_ID_KEY, self.store.active_id());
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        for turn in self.turns.values() {
            turn.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::models::{Artifact, MessageRole, MessageStatus};
    use crate::responder::{ResponseChunk, ScriptedResponder, StreamError};
    use crate::storage::MemoryStore;

    fn session_with(responder: ScriptedResponder) -> (ChatSession, MemoryStore) {
        let backend = MemoryStore::new();
        let persistence = PersistenceStore::new(Arc::new(backend.clone()));
        let session = ChatSession::restore(persistence, Arc::new(responder));
        (session, backend)
    }

    #[tokio::test]
    async fn test_send_message_streams_reply() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["Hello ", "there "]));

        let outcome = session.send_message("hi").await;

        assert!(outcome.is_started());
        let chat = session.active_chat();
        assert_eq!(chat.title, "hi");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, MessageRole::User);
        assert_eq!(chat.messages[1].content, "Hello there ");
        assert_eq!(chat.messages[1].status, MessageStatus::Complete);
        assert!(!session.is_in_flight(session.active_id()));
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));

        assert_eq!(
            session.begin_send("   \n"),
            SendOutcome::Ignored(IgnoreReason::EmptyInput)
        );
        assert!(session.active_chat().is_empty());
    }

    #[tokio::test]
    async fn test_second_send_ignored_while_in_flight() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));

        let first = session.begin_send("one");
        let second = session.begin_send("two");

        assert!(first.is_started());
        assert_eq!(second, SendOutcome::Ignored(IgnoreReason::InFlight));
        assert_eq!(session.active_chat().messages.len(), 2);

        session.wait_for_turn(first.turn().unwrap()).await;
        assert!(session.begin_send("two").is_started());
    }

    #[tokio::test]
    async fn test_guard_is_per_chat() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));

        let first = session.begin_send("in first chat");
        session.new_chat();
        let second = session.begin_send("in second chat");

        assert!(first.is_started());
        assert!(second.is_started());
        session.wait_for_turn(first.turn().unwrap()).await;
        session.wait_for_turn(second.turn().unwrap()).await;

        for chat in session.chats() {
            assert_eq!(chat.messages[1].content, "x ");
        }
    }

    #[tokio::test]
    async fn test_artifact_attached_on_completion() {
        let (mut session, _) = session_with(ScriptedResponder::new(vec![
            Ok(ResponseChunk::Fragment("code ".to_string())),
            Ok(ResponseChunk::Artifact(Artifact::code("let x = 1;"))),
        ]));

        session.send_message("show code").await;

        let reply = &session.active_chat().messages[1];
        assert_eq!(reply.artifact, Some(Artifact::code("let x = 1;")));
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_and_clears_guard() {
        let (mut session, _) = session_with(ScriptedResponder::new(vec![
            Ok(ResponseChunk::Fragment("partial ".to_string())),
            Err(StreamError::ConnectionLost("reset".to_string())),
        ]));

        session.send_message("q").await;

        let reply = &session.active_chat().messages[1];
        assert_eq!(reply.content, "partial ");
        assert!(matches!(reply.status, MessageStatus::Failed { .. }));
        assert!(!session.is_in_flight(session.active_id()));
    }

    #[tokio::test]
    async fn test_regenerate_replaces_reply_without_duplicating_prompt() {
        let responder = ScriptedResponder::fragments(["again "]);
        let (mut session, _) = session_with(responder.clone());

        session.send_message("question").await;
        let old_id = session.active_chat().messages[1].id.clone();

        let outcome = session.regenerate().await;

        assert!(outcome.is_started());
        let chat = session.active_chat();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].content, "question");
        assert_ne!(chat.messages[1].id, old_id);
        assert_eq!(responder.prompts(), vec!["question", "question"]);
    }

    #[tokio::test]
    async fn test_regenerate_noop_on_empty_chat() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));
        assert_eq!(
            session.begin_regenerate(),
            SendOutcome::Ignored(IgnoreReason::NothingToRegenerate)
        );
    }

    #[tokio::test]
    async fn test_cancel_marks_aborted_and_drops_late_events() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["a ", "b "]));

        let outcome = session.begin_send("q");
        let chat_id = session.active_id().to_string();
        assert!(session.cancel(&chat_id));
        assert!(!session.cancel(&chat_id));

        // Anything the driver managed to send is stale now
        let turn = outcome.turn().unwrap().clone();
        let late = SessionEvent::Fragment {
            turn,
            text: "late ".to_string(),
        };
        assert!(!session.handle_event(late));

        let reply = &session.active_chat().messages[1];
        assert_eq!(reply.status, MessageStatus::Aborted);
        assert!(!reply.content.contains("late"));
        assert!(session.begin_regenerate().is_started());
    }

    #[tokio::test]
    async fn test_clear_history_resets_and_cancels() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));
        session.send_message("one").await;
        session.new_chat();
        session.begin_send("two");

        let id = session.clear_history();

        assert_eq!(session.chats().len(), 1);
        assert_eq!(session.active_id(), id);
        assert!(session.active_chat().is_empty());
        assert!(!session.has_turns_in_flight());
    }

    #[tokio::test]
    async fn test_select_chat_ignores_unknown() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));
        let first = session.active_id().to_string();
        session.new_chat();

        assert!(!session.select_chat("missing"));
        assert!(session.select_chat(&first));
        assert_eq!(session.active_id(), first);
    }

    #[tokio::test]
    async fn test_sticky_question_is_last_user_message() {
        let (mut session, _) = session_with(ScriptedResponder::fragments(["x "]));
        assert_eq!(session.sticky_question(), None);

        session.send_message("first").await;
        session.send_message("second").await;

        assert_eq!(session.sticky_question(), Some("second"));
    }

    #[tokio::test]
    async fn test_state_persisted_and_restored() {
        let (mut session, backend) = session_with(ScriptedResponder::fragments(["saved "]));
        session.send_message("remember me").await;
        let active = session.active_id().to_string();
        drop(session);

        let persistence = PersistenceStore::new(Arc::new(backend));
        let restored = ChatSession::restore(
            persistence,
            Arc::new(ScriptedResponder::fragments(["x "])),
        );

        assert_eq!(restored.active_id(), active);
        assert_eq!(restored.active_chat().title, "remember me");
        assert_eq!(restored.active_chat().messages[1].content, "saved ");
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_fatal() {
        let backend = MemoryStore::new();
        backend.set_unavailable(true);
        let persistence = PersistenceStore::new(Arc::new(backend));
        let mut session =
            ChatSession::restore(persistence, Arc::new(ScriptedResponder::fragments(["ok "])));

        session.send_message("still works").await;

        assert_eq!(session.active_chat().messages[1].content, "ok ");
    }

    #[tokio::test]
    async fn test_copy_uses_clipboard() {
        let clipboard = MemoryClipboard::new();
        let (session, _) = session_with(ScriptedResponder::default());
        let session = session.with_clipboard(Arc::new(clipboard.clone()));

        session.copy("some text").unwrap();
        assert_eq!(clipboard.contents(), Some("some text".to_string()));

        clipboard.set_should_fail(true);
        assert!(session.copy("more").is_err());
    }
}
