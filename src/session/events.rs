//! Events and outcomes exchanged between turn drivers and the session.

use crate::models::Artifact;
use crate::responder::StreamError;

/// Identifies one streaming turn: the chat and the assistant message being
/// filled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnId {
    pub chat_id: String,
    pub message_id: String,
}

impl TurnId {
    pub fn new(chat_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// Produced by a turn driver, applied by [`ChatSession::handle_event`].
///
/// [`ChatSession::handle_event`]: super::ChatSession::handle_event
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A text fragment for the turn's assistant message
    Fragment { turn: TurnId, text: String },
    /// An artifact to attach once the turn completes
    Artifact { turn: TurnId, artifact: Artifact },
    /// The responder finished cleanly
    Completed { turn: TurnId },
    /// The responder failed; content received so far is kept
    Failed { turn: TurnId, error: StreamError },
}

impl SessionEvent {
    /// The turn this event belongs to.
    pub fn turn(&self) -> &TurnId {
        match self {
            SessionEvent::Fragment { turn, .. }
            | SessionEvent::Artifact { turn, .. }
            | SessionEvent::Completed { turn }
            | SessionEvent::Failed { turn, .. } => turn,
        }
    }

    /// Whether this event ends its turn.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::Completed { .. } | SessionEvent::Failed { .. }
        )
    }
}

/// Why a send or regenerate request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The text was empty or whitespace
    EmptyInput,
    /// The chat already has a reply streaming
    InFlight,
    /// The chat does not end in a finished user/assistant pair
    NothingToRegenerate,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::EmptyInput => write!(f, "nothing to send"),
            IgnoreReason::InFlight => {
                write!(f, "wait for the current response to complete")
            }
            IgnoreReason::NothingToRegenerate => write!(f, "nothing to regenerate"),
        }
    }
}

/// Result of [`ChatSession::begin_send`] and friends.
///
/// [`ChatSession::begin_send`]: super::ChatSession::begin_send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Started(TurnId),
    Ignored(IgnoreReason),
}

impl SendOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, SendOutcome::Started(_))
    }

    pub fn turn(&self) -> Option<&TurnId> {
        match self {
            SendOutcome::Started(turn) => Some(turn),
            SendOutcome::Ignored(_) => None,
        }
    }
}
