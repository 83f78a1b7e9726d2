//! Ranking of records against a free-text query

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::highlight::highlight;
use crate::matcher::{FieldMatcher, Tuning};
use crate::record::{field_text, Searchable};
use crate::suggest::generate_suggestions;
use crate::synonyms::SynonymTable;

/// Default minimum score a field must exceed
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default maximum number of results
pub const DEFAULT_LIMIT: usize = 50;

/// Search options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Fields to search, in priority order
    pub fields: Vec<String>,
    /// Minimum score threshold (0.0 - 1.0), exclusive
    pub threshold: f64,
    /// Maximum number of results
    pub limit: usize,
    /// Score synonym matches
    #[serde(alias = "include_synonyms")]
    pub include_synonyms: bool,
    /// Compare exact and fuzzy matches without folding case
    #[serde(alias = "case_sensitive")]
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            fields: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
            include_synonyms: true,
            case_sensitive: false,
        }
    }
}

impl SearchOptions {
    /// Default options over the given fields
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchOptions {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check the options are usable.
    ///
    /// Ranking itself accepts anything (no fields or a zero limit simply
    /// yield no results); this is for callers that build options from user
    /// input and want to reject mistakes early.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::InvalidOptions(
                "at least one field is required".to_string(),
            ));
        }
        if let Some(field) = self.fields.iter().find(|f| f.trim().is_empty()) {
            return Err(Error::InvalidOptions(format!(
                "field names must not be blank: {:?}",
                field
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidOptions(format!(
                "threshold must be within 0.0-1.0, got {}",
                self.threshold
            )));
        }
        if self.limit == 0 {
            return Err(Error::InvalidOptions(
                "limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a, R> {
    /// The matched record
    pub record: &'a R,
    /// Best field score
    pub score: f64,
    /// Fields scoring above the threshold, in configured order
    pub matched_fields: Vec<String>,
    /// Field that produced the best score
    pub best_field: String,
    /// Text of the best field with the first query occurrence marked
    pub highlighted_text: String,
}

/// The search engine.
///
/// Holds the synonym table and tuning constants; everything else is passed
/// per call. Cheap to share by reference, never mutated by searching.
#[derive(Debug, Clone, Default)]
pub struct SmartSearch {
    synonyms: SynonymTable,
    tuning: Tuning,
}

impl SmartSearch {
    /// Engine with the built-in product synonyms and default tuning
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the synonym table
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Replace the tuning constants
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Engine configured from a loaded config file
    pub fn from_config(config: &EngineConfig) -> Self {
        SmartSearch {
            synonyms: config.synonym_table(),
            tuning: config.tuning.clone(),
        }
    }

    /// The injected synonym table
    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// The tuning constants
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Field matcher bound to this engine's table and tuning
    pub fn matcher(&self) -> FieldMatcher<'_> {
        FieldMatcher::new(&self.synonyms, &self.tuning)
    }

    /// Score one field value against a query
    pub fn score_field(&self, query: &str, text: &str, options: &SearchOptions) -> f64 {
        self.matcher().score(query, text, options)
    }

    /// Highlight the first occurrence of `query` with this engine's class
    pub fn highlight(&self, text: &str, query: &str) -> String {
        highlight(text, query, &self.tuning.highlight_class)
    }

    /// Rank `records` against `query`.
    ///
    /// Each record scores as its best configured field. Records are kept when
    /// that score exceeds `options.threshold`, sorted by score descending
    /// (ties keep input order) and truncated to `options.limit`. A blank query
    /// yields no results.
    pub fn rank<'a, R: Searchable>(
        &self,
        records: &'a [R],
        query: &str,
        options: &SearchOptions,
    ) -> Vec<SearchResult<'a, R>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let matcher = self.matcher();
        let mut results = Vec::new();

        for record in records {
            let mut best_score = 0.0;
            let mut best: Option<(&str, Cow<'a, str>)> = None;
            let mut matched_fields = Vec::new();

            for (i, field) in options.fields.iter().enumerate() {
                if options.fields[..i].contains(field) {
                    continue;
                }

                let text = field_text(record, field);
                let score = matcher.score(query, &text, options);

                if score > options.threshold {
                    matched_fields.push(field.clone());
                }
                if score > best_score {
                    best_score = score;
                    best = Some((field.as_str(), text));
                }
            }

            if matched_fields.is_empty() || best_score <= options.threshold {
                continue;
            }

            let Some((best_field, best_text)) = best else {
                continue;
            };

            results.push(SearchResult {
                record,
                score: best_score,
                matched_fields,
                best_field: best_field.to_string(),
                highlighted_text: self.highlight(&best_text, query),
            });
        }

        // Stable: equal scores keep record order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(options.limit);

        tracing::debug!(
            "Ranked {} of {} records for {:?}",
            results.len(),
            records.len(),
            query
        );

        results
    }

    /// Autocomplete suggestions for `query`; see [`generate_suggestions`]
    pub fn suggest<R: Searchable, S: AsRef<str>>(
        &self,
        records: &[R],
        query: &str,
        fields: &[S],
        max_suggestions: usize,
    ) -> Vec<String> {
        generate_suggestions(records, query, fields, max_suggestions, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn products() -> Vec<Value> {
        vec![
            json!({"name": "Organic Turmeric Powder", "description": "Ground turmeric root"}),
            json!({"name": "Black Pepper", "description": "Whole peppercorns"}),
            json!({"name": "Red Onion", "description": "Fresh bulb vegetables"}),
        ]
    }

    #[test]
    fn test_rank_exact_match() {
        let records = products();
        let engine = SmartSearch::new();
        let results = engine.rank(&records, "pepper", &SearchOptions::new(["name"]));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record["name"], "Black Pepper");
        assert!(results[0].score >= 1.0);
        assert_eq!(results[0].matched_fields, vec!["name"]);
        assert_eq!(results[0].best_field, "name");
        assert_eq!(
            results[0].highlighted_text,
            r#"Black <mark class="bg-yellow-200 px-1 rounded">Pepper</mark>"#
        );
    }

    #[test]
    fn test_rank_blank_query() {
        let records = products();
        let engine = SmartSearch::new();
        assert!(engine.rank(&records, "", &SearchOptions::new(["name"])).is_empty());
        assert!(engine.rank(&records, "  \n", &SearchOptions::new(["name"])).is_empty());
    }

    #[test]
    fn test_rank_matched_fields_and_best_field() {
        let records = products();
        let engine = SmartSearch::new();
        let options = SearchOptions::new(["name", "description"]);
        let results = engine.rank(&records, "turmeric", &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_fields, vec!["name", "description"]);
        // "Ground turmeric root": shorter text, better coverage
        assert_eq!(results[0].best_field, "description");
    }

    #[test]
    fn test_rank_repeated_field_matches_once() {
        let records = products();
        let engine = SmartSearch::new();
        let options = SearchOptions::new(["name", "description", "name"]);
        let results = engine.rank(&records, "turmeric", &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_fields, vec!["name", "description"]);
    }

    #[test]
    fn test_rank_missing_field_is_not_an_error() {
        let records = vec![json!({"title": "Pepper"}), json!({"name": "Pepper"})];
        let engine = SmartSearch::new();
        let results = engine.rank(&records, "pepper", &SearchOptions::new(["name"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record["name"], "Pepper");
    }

    #[test]
    fn test_rank_stable_ties() {
        let records = vec![
            json!({"id": 1, "name": "rice"}),
            json!({"id": 2, "name": "rice"}),
            json!({"id": 3, "name": "rice"}),
        ];
        let engine = SmartSearch::new();
        let results = engine.rank(&records, "rice", &SearchOptions::new(["name"]));
        let ids: Vec<i64> = results.iter().map(|r| r.record["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_limit() {
        let records: Vec<Value> = (0..10).map(|i| json!({"name": format!("spice {}", i)})).collect();
        let engine = SmartSearch::new();
        let options = SearchOptions {
            limit: 3,
            ..SearchOptions::new(["name"])
        };
        assert_eq!(engine.rank(&records, "spice", &options).len(), 3);
    }

    #[test]
    fn test_rank_threshold_excludes_synonym_hits() {
        let records = products();
        let engine = SmartSearch::new();
        let options = SearchOptions {
            threshold: 0.75,
            ..SearchOptions::new(["description"])
        };
        // Synonym score 0.7 is not above 0.75
        assert!(engine.rank(&records, "onion", &options).is_empty());
    }

    #[test]
    fn test_rank_with_empty_synonym_table() {
        let records = products();
        let engine = SmartSearch::new().with_synonyms(SynonymTable::empty());
        let results = engine.rank(&records, "onion", &SearchOptions::new(["description"]));
        assert!(results.is_empty());
    }

    #[test]
    fn test_validate_options() {
        assert!(SearchOptions::new(["name"]).validate().is_ok());
        assert!(SearchOptions::default().validate().is_err());
        assert!(SearchOptions::new([" "]).validate().is_err());

        let bad_threshold = SearchOptions {
            threshold: 1.5,
            ..SearchOptions::new(["name"])
        };
        assert!(bad_threshold.validate().is_err());

        let bad_limit = SearchOptions {
            limit: 0,
            ..SearchOptions::new(["name"])
        };
        assert!(bad_limit.validate().is_err());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let records = products();
        let engine = SmartSearch::new();
        let results = engine.rank(&records, "pepper", &SearchOptions::new(["name"]));
        let json = serde_json::to_value(&results[0]).unwrap();
        assert!(json.get("matchedFields").is_some());
        assert!(json.get("highlightedText").is_some());
        assert_eq!(json["record"]["name"], "Black Pepper");
    }

    #[test]
    fn test_options_camel_case_keys() {
        let options: SearchOptions = serde_json::from_value(json!({
            "fields": ["name"],
            "includeSynonyms": false,
            "caseSensitive": true
        }))
        .unwrap();
        assert!(!options.include_synonyms);
        assert!(options.case_sensitive);

        let options: SearchOptions =
            serde_json::from_value(json!({"include_synonyms": false})).unwrap();
        assert!(!options.include_synonyms);

        let json = serde_json::to_value(SearchOptions::default()).unwrap();
        assert_eq!(json["includeSynonyms"], true);
        assert_eq!(json["caseSensitive"], false);
    }
}
