//! Field matching: exact, fuzzy and synonym scores for one field
//!
//! A field's score is the best of three independent evaluations:
//!
//! - **Exact**: the query occurs as a substring. Scores at least 1.0, more for
//!   matches near the start and matches covering more of the text.
//! - **Fuzzy**: edit-distance similarity above a floor, scaled below 1.0 so it
//!   never outranks a substring hit.
//! - **Synonym**: a flat score when the text contains a synonym of a term in
//!   the query.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::distance::similarity;
use crate::search::SearchOptions;
use crate::synonyms::SynonymTable;

/// Default CSS class for highlight spans
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "bg-yellow-200 px-1 rounded";

/// Scoring and presentation constants.
///
/// The defaults reproduce the product behavior. They have no derivation
/// beyond "looked right", so they are exposed for tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Weight of match position in the exact score
    pub exact_position_weight: f64,
    /// Weight of query/text length ratio in the exact score
    pub exact_coverage_weight: f64,
    /// Similarity a fuzzy match must exceed
    pub fuzzy_floor: f64,
    /// Multiplier applied to accepted fuzzy similarity
    pub fuzzy_weight: f64,
    /// Flat score for a synonym match
    pub synonym_score: f64,
    /// Characters kept before a match in substring suggestions
    pub suggestion_lead: usize,
    /// Characters kept after the match start, beyond the query length
    pub suggestion_tail: usize,
    /// CSS class on `<mark>` highlight spans
    pub highlight_class: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            exact_position_weight: 0.5,
            exact_coverage_weight: 0.3,
            fuzzy_floor: 0.6,
            fuzzy_weight: 0.8,
            synonym_score: 0.7,
            suggestion_lead: 10,
            suggestion_tail: 20,
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

fn fold(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_lowercase())
    }
}

/// Scores a query against single field values
#[derive(Debug, Clone, Copy)]
pub struct FieldMatcher<'a> {
    synonyms: &'a SynonymTable,
    tuning: &'a Tuning,
}

impl<'a> FieldMatcher<'a> {
    /// Create a matcher over an injected synonym table
    pub fn new(synonyms: &'a SynonymTable, tuning: &'a Tuning) -> Self {
        FieldMatcher { synonyms, tuning }
    }

    /// Score `query` against one field's `text`.
    ///
    /// Returns 0.0 if either side is blank.
    pub fn score(&self, query: &str, text: &str, options: &SearchOptions) -> f64 {
        if query.trim().is_empty() || text.trim().is_empty() {
            return 0.0;
        }

        let query_folded = fold(query, options.case_sensitive);
        let text_folded = fold(text, options.case_sensitive);

        let exact = self.exact_score(&query_folded, &text_folded);
        let fuzzy = self.fuzzy_score(&query_folded, &text_folded);
        let synonym = if options.include_synonyms {
            self.synonym_score(query, text)
        } else {
            0.0
        };

        exact.max(fuzzy).max(synonym)
    }

    /// Substring score: `1 + (1 - pos/len) * position_weight + (qlen/len) * coverage_weight`.
    ///
    /// Inputs are compared as given; fold case before calling.
    pub fn exact_score(&self, query: &str, text: &str) -> f64 {
        if query.is_empty() || text.is_empty() {
            return 0.0;
        }

        let Some(byte_pos) = text.find(query) else {
            return 0.0;
        };

        let position = text[..byte_pos].chars().count() as f64;
        let text_len = text.chars().count() as f64;
        let query_len = query.chars().count() as f64;

        1.0 + (1.0 - position / text_len) * self.tuning.exact_position_weight
            + (query_len / text_len) * self.tuning.exact_coverage_weight
    }

    /// Edit-distance score, 0.0 unless similarity clears the floor.
    ///
    /// Similarity is taken against the whole text and against every run of
    /// consecutive words as long as the query, so a misspelled word inside a
    /// longer name still scores.
    pub fn fuzzy_score(&self, query: &str, text: &str) -> f64 {
        let similarity = best_similarity(query, text);
        if similarity > self.tuning.fuzzy_floor {
            similarity * self.tuning.fuzzy_weight
        } else {
            0.0
        }
    }

    /// Flat synonym score if `text` holds a synonym of a query term
    pub fn synonym_score(&self, query: &str, text: &str) -> f64 {
        if self.synonyms.matches(query, text) {
            self.tuning.synonym_score
        } else {
            0.0
        }
    }
}

fn best_similarity(query: &str, text: &str) -> f64 {
    let mut best = similarity(query, text);

    let words: Vec<&str> = text.split_whitespace().collect();
    let width = query.split_whitespace().count().max(1);
    if words.len() >= width {
        for window in words.windows(width) {
            best = best.max(similarity(query, &window.join(" ")));
        }
    }

    best
}
