//! Per-turn driver tasks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::events::{SessionEvent, TurnId};
use crate::models::Artifact;
use crate::responder::{ResponseChunk, ResponseStream};

/// Bookkeeping for a turn that has not ended yet.
#[derive(Debug)]
pub(super) struct ActiveTurn {
    pub message_id: String,
    pub cancel: Arc<AtomicBool>,
    /// Held until `Completed` arrives
    pub artifact: Option<Artifact>,
}

impl ActiveTurn {
    pub fn new(message_id: String) -> Self {
        Self {
            message_id,
            cancel: Arc::new(AtomicBool::new(false)),
            artifact: None,
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }
}

/// Spawn a task that pulls `stream` and forwards each item to the session.
///
/// The cancel flag is checked before every forward. Once it is set the task
/// stops without sending anything further.
pub(super) fn spawn_driver(
    mut stream: ResponseStream,
    turn: TurnId,
    cancel: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<SessionEvent>,
) {
    tokio::spawn(async move {
        let mut fragments = 0usize;
        while let Some(item) = stream.next().await {
            if cancel.load(Ordering::Acquire) {
                tracing::debug!(message_id = %turn.message_id, fragments, "Turn cancelled");
                return;
            }
            let event = match item {
                Ok(ResponseChunk::Fragment(text)) => {
                    fragments += 1;
                    SessionEvent::Fragment {
                        turn: turn.clone(),
                        text,
                    }
                }
                Ok(ResponseChunk::Artifact(artifact)) => SessionEvent::Artifact {
                    turn: turn.clone(),
                    artifact,
                },
                Err(error) => {
                    tracing::warn!(message_id = %turn.message_id, error = %error, "Responder failed");
                    let _ = tx.send(SessionEvent::Failed { turn, error });
                    return;
                }
            };
            if tx.send(event).is_err() {
                // Session dropped
                return;
            }
        }

        if !cancel.load(Ordering::Acquire) {
            tracing::debug!(message_id = %turn.message_id, fragments, "Turn completed");
            let _ = tx.send(SessionEvent::Completed { turn });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::{StreamError, StreamingResponder, ScriptedResponder};

    async fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = event.is_terminal();
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn test_driver_forwards_in_order_then_completes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let responder = ScriptedResponder::fragments(["a ", "b ", "c "]);
        let turn = TurnId::new("chat", "msg");

        spawn_driver(
            responder.respond("p"),
            turn.clone(),
            Arc::new(AtomicBool::new(false)),
            tx,
        );

        let events = drain(&mut rx).await;
        let texts: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Fragment { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["a ", "b ", "c "]);
        assert_eq!(events.last(), Some(&SessionEvent::Completed { turn }));
    }

    #[tokio::test]
    async fn test_driver_stops_on_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let responder = ScriptedResponder::new(vec![
            Ok(ResponseChunk::Fragment("part ".to_string())),
            Err(StreamError::ConnectionLost("reset".to_string())),
            Ok(ResponseChunk::Fragment("never ".to_string())),
        ]);

        spawn_driver(
            responder.respond("p"),
            TurnId::new("chat", "msg"),
            Arc::new(AtomicBool::new(false)),
            tx,
        );

        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SessionEvent::Failed { .. }));
    }

    #[tokio::test]
    async fn test_driver_sends_nothing_once_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let responder = ScriptedResponder::fragments(["a ", "b "]);
        let cancel = Arc::new(AtomicBool::new(true));

        spawn_driver(responder.respond("p"), TurnId::new("c", "m"), cancel, tx);

        // Sender is dropped when the task exits, closing the channel
        assert!(rx.recv().await.is_none());
    }
}
