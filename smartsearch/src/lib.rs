//! # Smart Search
//!
//! In-memory ranking of arbitrary records against a free-text query.
//!
//! Smart Search provides:
//! - **Ranking** that blends exact substring, fuzzy (Levenshtein) and synonym
//!   matches across configurable fields
//! - **Highlighting** of the matched span in the best field
//! - **Suggestions** for autocomplete from the same records
//! - **History** of recent queries over a pluggable key-value store
//! - **Advanced filters** by category, price, status, date and tags
//!
//! Records are anything implementing [`Searchable`]; JSON values and string
//! maps work out of the box. Every scan is over the whole collection, which
//! suits hundreds of records, not millions.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use smartsearch::{MemoryStore, SearchHistory, SearchOptions, SmartSearch};
//!
//! let products = vec![
//!     json!({"name": "Organic Turmeric Powder"}),
//!     json!({"name": "Black Pepper"}),
//! ];
//!
//! let engine = SmartSearch::new();
//! let results = engine.rank(&products, "turmric", &SearchOptions::new(["name"]));
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].record["name"], "Organic Turmeric Powder");
//!
//! let suggestions = engine.suggest(&products, "pe", &["name"], 5);
//! assert_eq!(suggestions, vec!["pepper", "black pepper"]);
//!
//! let mut history = SearchHistory::new(MemoryStore::new());
//! history.add("turmric").unwrap();
//! assert_eq!(history.get_history(), vec!["turmric"]);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod history;
pub mod matcher;
pub mod record;
pub mod search;
pub mod suggest;
pub mod synonyms;

// Re-exports for convenience
pub use config::EngineConfig;
pub use distance::levenshtein;
pub use error::{Error, Result};
pub use filter::{apply_filters, AdvancedFilters, DateRange, PriceRange};
pub use highlight::highlight;
pub use history::{JsonFileStore, KeyValueStore, MemoryStore, SearchHistory};
pub use matcher::{FieldMatcher, Tuning};
pub use record::{load_records, Searchable};
pub use search::{SearchOptions, SearchResult, SmartSearch};
pub use suggest::{generate_suggestions, DEFAULT_MAX_SUGGESTIONS};
pub use synonyms::SynonymTable;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default history file path
pub fn default_history_path() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("smartsearch")
        .join("history.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_history_path() {
        let path = default_history_path();
        assert!(path.ends_with("smartsearch/history.json"));
    }
}
