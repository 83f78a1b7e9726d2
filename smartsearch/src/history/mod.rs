//! Recent search history
//!
//! A capped, deduplicated, most-recent-first list of committed queries,
//! persisted as a JSON array of strings under a single key.

mod store;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Key the history list is stored under
pub const DEFAULT_HISTORY_KEY: &str = "smartsearch_history";

/// Number of queries kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// History settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Storage key
    pub key: String,
    /// Maximum number of entries
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            key: DEFAULT_HISTORY_KEY.to_string(),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Search history over a key-value store
#[derive(Debug)]
pub struct SearchHistory<S> {
    store: S,
    config: HistoryConfig,
}

impl<S: KeyValueStore> SearchHistory<S> {
    /// History with the default key and capacity
    pub fn new(store: S) -> Self {
        Self::with_config(store, HistoryConfig::default())
    }

    /// History with explicit settings
    pub fn with_config(store: S, config: HistoryConfig) -> Self {
        SearchHistory { store, config }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the history, returning its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Record a committed query.
    ///
    /// Blank queries are ignored. An existing identical entry moves to the
    /// front instead of being duplicated; the oldest entries beyond capacity
    /// are dropped.
    pub fn add(&mut self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Ok(());
        }

        let mut history = self.get_history();
        history.retain(|entry| entry != query);
        history.insert(0, query.to_string());
        history.truncate(self.config.capacity);

        let encoded = serde_json::to_string(&history)?;
        self.store.set(&self.config.key, &encoded)
    }

    /// Stored queries, most recent first.
    ///
    /// An empty, unreadable or corrupt store reads as an empty history. A
    /// corrupt value is left in place until the next write replaces it.
    pub fn get_history(&self) -> Vec<String> {
        let raw = match self.store.get(&self.config.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Search history unreadable: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Ignoring corrupt search history: {}", e);
                Vec::new()
            }
        }
    }

    /// Forget every stored query
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.config.key)
    }
}
