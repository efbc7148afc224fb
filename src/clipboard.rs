//! Clipboard access for copying message text.
//!
//! [`SystemClipboard`] talks to the OS clipboard through `arboard`;
//! [`MemoryClipboard`] keeps the last copied text in memory for tests and
//! headless runs.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors that can occur when writing to the clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The platform clipboard could not be opened
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    /// The platform clipboard rejected the write
    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Destination for copied text.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard.
///
/// A fresh `arboard` handle is opened per write; holding one open for the
/// life of the process keeps X11 selections owned by us.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// In-memory clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    /// Configure whether writes should fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap_or_else(|e| e.into_inner()) = should_fail;
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if *self.should_fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(ClipboardError::WriteFailed("configured to fail".to_string()));
        }
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
