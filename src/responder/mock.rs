//! Mock responders.

use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};

use super::{ResponseChunk, ResponsePolicy, ResponseStream, StreamError, StreamingResponder};

/// Plays a policy-chosen reply back one word at a time.
///
/// Each fragment is a word followed by a single space and is preceded by the
/// policy's fragment delay. If the reply carries an artifact it is emitted
/// after the last fragment.
#[derive(Clone)]
pub struct MockResponder {
    policy: Arc<dyn ResponsePolicy>,
}

impl std::fmt::Debug for MockResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockResponder").finish_non_exhaustive()
    }
}

impl MockResponder {
    /// Create a responder driven by `policy`.
    pub fn new(policy: Arc<dyn ResponsePolicy>) -> Self {
        Self { policy }
    }
}

/// Split reply text into word fragments, each with a trailing space.
pub(crate) fn word_fragments(text: &str) -> Vec<String> {
    text.split(' ').map(|word| format!("{} ", word)).collect()
}

impl StreamingResponder for MockResponder {
    fn respond(&self, prompt: &str) -> ResponseStream {
        let reply = self.policy.compose(prompt);
        tracing::debug!(
            prompt_len = prompt.len(),
            reply_len = reply.text.len(),
            artifact = reply.artifact.is_some(),
            "Composed mock reply"
        );

        let policy = Arc::clone(&self.policy);
        let fragments = stream::iter(word_fragments(&reply.text)).then(move |fragment| {
            let delay = policy.fragment_delay();
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(ResponseChunk::Fragment(fragment))
            }
        });
        let artifact = stream::iter(reply.artifact.map(|a| Ok(ResponseChunk::Artifact(a))));

        fragments.chain(artifact).boxed()
    }
}

/// Replays a fixed script of chunks and errors, the same for every prompt.
///
/// Records every prompt it receives so tests can assert on them.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResponder {
    script: Vec<Result<ResponseChunk, StreamError>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResponder {
    /// Replay `script` for every prompt.
    pub fn new(script: Vec<Result<ResponseChunk, StreamError>>) -> Self {
        Self {
            script,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience: stream the given fragments and finish cleanly.
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            fragments
                .into_iter()
                .map(|f| Ok(ResponseChunk::Fragment(f.into())))
                .collect(),
        )
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl StreamingResponder for ScriptedResponder {
    fn respond(&self, prompt: &str) -> ResponseStream {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        stream::iter(self.script.clone()).boxed()
    }
}
