//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let (mut session, backend) = TestSessionBuilder::new()
//!     .with_responder(fixed_responder("Hello there"))
//!     .build();
//! ```

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use std::sync::Arc;

use chatloom::clipboard::MemoryClipboard;
use chatloom::names::NameIndex;
use chatloom::responder::{FixedPolicy, MockResponder, Reply, StreamingResponder};
use chatloom::session::ChatSession;
use chatloom::storage::{MemoryStore, PersistenceStore};

/// Small name index for tests that do not need the full million.
#[allow(dead_code)]
pub fn test_names() -> Arc<NameIndex> {
    Arc::new(NameIndex::synthetic(1000))
}

/// A mock responder that always streams `text` with no delay.
#[allow(dead_code)]
pub fn fixed_responder(text: &str) -> Arc<dyn StreamingResponder> {
    Arc::new(MockResponder::new(Arc::new(FixedPolicy::new(Reply::text(text)))))
}

/// Builder for sessions backed by a shared in-memory store.
pub struct TestSessionBuilder {
    backend: MemoryStore,
    responder: Arc<dyn StreamingResponder>,
    clipboard: MemoryClipboard,
}

#[allow(dead_code)]
impl TestSessionBuilder {
    pub fn new() -> Self {
        Self {
            backend: MemoryStore::new(),
            responder: fixed_responder("Default reply"),
            clipboard: MemoryClipboard::new(),
        }
    }

    /// Restore from (and save to) an existing backend.
    pub fn with_backend(mut self, backend: MemoryStore) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_responder(mut self, responder: Arc<dyn StreamingResponder>) -> Self {
        self.responder = responder;
        self
    }

    pub fn with_clipboard(mut self, clipboard: MemoryClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Build the session. The returned backend shares storage with it.
    pub fn build(self) -> (ChatSession, MemoryStore) {
        let persistence = PersistenceStore::new(Arc::new(self.backend.clone()));
        let session = ChatSession::restore(persistence, self.responder)
            .with_clipboard(Arc::new(self.clipboard));
        (session, self.backend)
    }
}

impl Default for TestSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
