//! Mock collaborators for integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use chatloom::models::Artifact;
use chatloom::responder::{ResponseChunk, ResponseStream, StreamError, StreamingResponder};

type ChunkSender = mpsc::UnboundedSender<Result<ResponseChunk, StreamError>>;

/// Responder whose chunks are pushed by the test, one channel per turn.
///
/// Lets a test hold a turn open, inspect the session mid-stream and then
/// finish or fail it.
#[derive(Clone, Default)]
pub struct ChannelResponder {
    senders: Arc<Mutex<VecDeque<ChunkSender>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ChannelResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed for the oldest turn not yet taken.
    pub fn next_turn(&self) -> Option<TurnFeed> {
        self.senders
            .lock()
            .unwrap()
            .pop_front()
            .map(|tx| TurnFeed { tx })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl StreamingResponder for ChannelResponder {
    fn respond(&self, prompt: &str) -> ResponseStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push_back(tx);
        self.prompts.lock().unwrap().push(prompt.to_string());

        stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
    }
}

/// Feeds one turn of a [`ChannelResponder`]. Dropping it ends the stream.
pub struct TurnFeed {
    tx: ChunkSender,
}

#[allow(dead_code)]
impl TurnFeed {
    pub fn fragment(&self, text: &str) {
        let _ = self.tx.send(Ok(ResponseChunk::Fragment(text.to_string())));
    }

    pub fn artifact(&self, code: &str) {
        let _ = self.tx.send(Ok(ResponseChunk::Artifact(Artifact::code(code))));
    }

    pub fn fail(self, error: StreamError) {
        let _ = self.tx.send(Err(error));
    }

    /// End the stream cleanly.
    pub fn finish(self) {}
}
