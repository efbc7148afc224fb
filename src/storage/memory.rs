//! In-memory storage backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StorageError};

/// In-memory key-value store.
///
/// Fault switches let tests simulate a disabled store or a full quota.
///
/// # Example
///
/// ```
/// use chatloom::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.put("activeId", "\"abc\"").unwrap();
/// assert_eq!(store.get("activeId").unwrap().as_deref(), Some("\"abc\""));
///
/// store.set_unavailable(true);
/// assert!(store.get("activeId").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<Mutex<bool>>,
    /// Maximum total bytes across all values; `None` means unlimited
    quota_bytes: Arc<Mutex<Option<usize>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the store were disabled.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) = unavailable;
    }

    /// Limit the total stored bytes.
    pub fn set_quota_bytes(&self, quota: Option<usize>) {
        *self.quota_bytes.lock().unwrap_or_else(|e| e.into_inner()) = quota;
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        let quota = *self.quota_bytes.lock().unwrap_or_else(|e| e.into_inner());

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(limit) = quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }
}

/// A backend that is always unavailable (memory-only mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("persistence disabled".to_string()))
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("persistence disabled".to_string()))
    }
}
