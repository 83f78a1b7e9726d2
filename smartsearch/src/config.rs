//! Engine configuration files
//!
//! A config file may set any subset of:
//!
//! ```yaml
//! search:
//!   fields: [name, description]
//!   threshold: 0.3
//!   limit: 50
//!   includeSynonyms: true
//!   caseSensitive: false
//! tuning:
//!   synonym_score: 0.7
//!   highlight_class: "hl"
//! extra_synonyms:
//!   ginger: [rhizome, root]
//! history:
//!   key: smartsearch_history
//!   capacity: 10
//! ```
//!
//! `synonyms` replaces the built-in table outright; `extra_synonyms` is
//! merged into whichever table is in effect.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::HistoryConfig;
use crate::matcher::Tuning;
use crate::search::SearchOptions;
use crate::synonyms::SynonymTable;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default search options
    pub search: SearchOptions,
    /// Scoring and presentation constants
    pub tuning: Tuning,
    /// Replacement synonym table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<HashMap<String, Vec<String>>>,
    /// Synonyms merged into the table in effect
    pub extra_synonyms: HashMap<String, Vec<String>>,
    /// History settings
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Load a config file, choosing YAML or JSON by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(&text)?,
            "json" => Self::from_json(&text)?,
            _ => {
                return Err(Error::ConfigError(format!(
                    "Unsupported config format: {} (expected .yaml, .yml or .json)",
                    path.display()
                )))
            }
        };

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse YAML config text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON config text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the engine misbehave.
    ///
    /// `search.fields` may be empty here; callers supply fields per query.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(Error::ConfigError(format!(
                "search.threshold must be within 0.0-1.0, got {}",
                self.search.threshold
            )));
        }
        if self.search.limit == 0 {
            return Err(Error::ConfigError(
                "search.limit must be positive".to_string(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(Error::ConfigError(
                "history.capacity must be positive".to_string(),
            ));
        }
        if self.history.key.trim().is_empty() {
            return Err(Error::ConfigError(
                "history.key must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// The synonym table this config describes
    pub fn synonym_table(&self) -> SynonymTable {
        let base = match &self.synonyms {
            Some(table) => SynonymTable::empty().extended(table),
            None => SynonymTable::default(),
        };
        base.extended(&self.extra_synonyms)
    }
}
