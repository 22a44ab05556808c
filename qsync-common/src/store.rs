//! State store abstraction
//!
//! All persisted application state is a flat set of string key/value pairs:
//! the serialized quote collection, the last selected filter and the last
//! sync timestamp. The `StateStore` trait keeps the repository and sync core
//! independent of the backing medium, so they can be exercised against the
//! in-memory backend in tests. Sqlite backend lives in [`crate::db`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::Result;

/// Well-known store keys
pub mod keys {
    /// Serialized quote collection (JSON array)
    pub const QUOTES: &str = "quotes";
    /// Last selected filter category
    pub const LAST_FILTER: &str = "last_selected_filter";
    /// Last successful sync timestamp (unix milliseconds)
    pub const LAST_SYNC: &str = "last_sync_timestamp";
    /// Session: last viewed quote (JSON)
    pub const LAST_VIEWED: &str = "last_viewed_quote";
    /// Session: quote view counter
    pub const VIEW_COUNT: &str = "quote_view_count";
}

/// String key/value store for application state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value; returns None when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key (absent key is not an error)
    async fn remove(&self, key: &str) -> Result<()>;

    /// Delete every key
    async fn clear(&self) -> Result<()>;
}

/// In-process store backing the ephemeral session state; also the test
/// double for the persistent store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("memory store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        entries.clear();
        Ok(())
    }
}
