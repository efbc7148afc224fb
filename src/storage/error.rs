//! Storage error type.

use thiserror::Error;

/// Faults a storage backend can report.
///
/// None of these reach session callers: [`PersistenceStore`](super::PersistenceStore)
/// logs and absorbs them.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is disabled or otherwise unreachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write because it is full
    #[error("Storage quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    /// Filesystem error
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "storage_unavailable",
            StorageError::QuotaExceeded { .. } => "storage_quota_exceeded",
            StorageError::Io(_) => "storage_io",
            StorageError::Serialization(_) => "storage_serialization",
        }
    }
}
