//! Response generation.
//!
//! A [`StreamingResponder`] turns a prompt into a lazy stream of
//! [`ResponseChunk`]s. The only implementation shipped here is
//! [`MockResponder`], which plays back canned text word by word; which text,
//! whether an artifact is attached and how long to wait between fragments are
//! all decided by an injected [`ResponsePolicy`].

mod error;
mod mock;
mod policy;

pub use error::StreamError;
pub use mock::{MockResponder, ScriptedResponder};
pub use policy::{
    FixedPolicy, RandomPolicy, Reply, ResponsePolicy, ARTIFACT_CODE, ARTIFACT_PROBABILITY,
    ARTIFACT_REPLY, CANNED_RESPONSES, MAX_FRAGMENT_DELAY, MIN_FRAGMENT_DELAY,
};

use futures::stream::BoxStream;

use crate::models::Artifact;

/// One item produced by a responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseChunk {
    /// A piece of assistant text, appended in arrival order
    Fragment(String),
    /// A structured payload, attached once the stream completes
    Artifact(Artifact),
}

/// Stream of response chunks for a single turn.
pub type ResponseStream = BoxStream<'static, Result<ResponseChunk, StreamError>>;

/// Produces assistant replies as a lazy sequence of chunks.
///
/// Implementations must not block: any waiting happens inside the returned
/// stream, between items.
pub trait StreamingResponder: Send + Sync {
    /// Start producing a reply to `prompt`.
    fn respond(&self, prompt: &str) -> ResponseStream;
}
