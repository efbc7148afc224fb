//! Best-effort persistence for conversation state.
//!
//! Backends implement [`KeyValueStore`] and may fail. [`PersistenceStore`] wraps
//! a backend, does the JSON encoding, and never lets a storage fault reach the
//! caller: failed saves are logged and dropped, failed or corrupt loads read as
//! absent. The in-memory session keeps working either way.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::{DisabledStore, MemoryStore};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the serialized chat collection.
pub const CHATS_KEY: &str = "chats";

/// Key holding the active chat id.
pub const ACTIVE_ID_KEY: &str = "activeId";

/// Raw string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch the value under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if a value is stored
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(error)` if the backend could not be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// JSON persistence over a [`KeyValueStore`] that absorbs every fault.
#[derive(Clone)]
pub struct PersistenceStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PersistenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceStore").finish_non_exhaustive()
    }
}

impl PersistenceStore {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store that never persists anything.
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledStore))
    }

    /// Serialize and store `value` under `key`. Faults are logged, not returned.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            tracing::warn!(key, code = e.error_code(), "Persisting state failed: {}", e);
        }
    }

    /// Load the value under `key`. Missing, unreadable or corrupt data reads as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, code = e.error_code(), "Loading state failed: {}", e);
                None
            }
        }
    }

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.backend.put(key, &json)
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let store = PersistenceStore::new(Arc::new(MemoryStore::new()));
        store.save("numbers", &vec![1, 2, 3]);
        assert_eq!(store.load::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = PersistenceStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(store.load::<String>("nothing"), None);
    }

    #[test]
    fn test_corrupt_json_reads_as_none() {
        let backend = Arc::new(MemoryStore::new());
        backend.put("chats", "{not json").unwrap();
        let store = PersistenceStore::new(backend);
        assert_eq!(store.load::<Vec<String>>("chats"), None);
    }

    #[test]
    fn test_disabled_store_absorbs_faults() {
        let store = PersistenceStore::disabled();
        store.save("chats", &"value");
        assert_eq!(store.load::<String>("chats"), None);
    }

    #[test]
    fn test_quota_fault_keeps_previous_value() {
        let backend = Arc::new(MemoryStore::new());
        let store = PersistenceStore::new(backend.clone());
        store.save("key", "first");

        backend.set_quota_bytes(Some(4));
        store.save("key", "a much longer second value");

        assert_eq!(store.load::<String>("key"), Some("first".to_string()));
    }
}
