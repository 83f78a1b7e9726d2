//! Property-based tests using proptest.
//!
//! These check the algebraic guarantees of the engine for random inputs:
//! distance symmetry, ranking order and threshold, suggestion bounds and
//! history dedupe/capacity.

use proptest::prelude::*;
use serde_json::{json, Value};
use smartsearch::{
    levenshtein, FieldMatcher, MemoryStore, SearchHistory, SearchOptions, SmartSearch,
    SynonymTable, Tuning,
};

/// Generate random word-like strings.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

/// Generate short multi-word field text.
fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..5).prop_map(|words| words.join(" "))
}

/// Generate a small collection of single-field records.
fn records_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(text_strategy(), 0..12)
        .prop_map(|names| names.into_iter().map(|name| json!({ "name": name })).collect())
}

proptest! {
    #[test]
    fn prop_levenshtein_symmetric(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn prop_levenshtein_identity(a in "\\PC{0,16}") {
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn prop_levenshtein_bounded_by_longer(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
        let d = levenshtein(&a, &b);
        prop_assert!(d <= a.chars().count().max(b.chars().count()));
        prop_assert!(d >= a.chars().count().abs_diff(b.chars().count()));
    }

    #[test]
    fn prop_contained_query_scores_at_least_one(
        prefix in "[a-z ]{0,10}",
        query in "[a-z]{1,6}",
        suffix in "[a-z ]{0,10}",
    ) {
        let text = format!("{}{}{}", prefix, query.to_uppercase(), suffix);
        let synonyms = SynonymTable::default();
        let tuning = Tuning::default();
        let matcher = FieldMatcher::new(&synonyms, &tuning);
        prop_assert!(matcher.score(&query, &text, &SearchOptions::default()) >= 1.0);
    }

    #[test]
    fn prop_rank_sorted_above_threshold_and_stable(
        records in records_strategy(),
        query in word_strategy(),
        threshold in 0.0f64..1.0,
    ) {
        let engine = SmartSearch::new();
        let options = SearchOptions { threshold, ..SearchOptions::new(["name"]) };
        let results = engine.rank(&records, &query, &options);

        prop_assert!(results.len() <= options.limit);
        for result in &results {
            prop_assert!(result.score > threshold);
            prop_assert!(!result.matched_fields.is_empty());
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                let first = records.iter().position(|r| std::ptr::eq(r, pair[0].record));
                let second = records.iter().position(|r| std::ptr::eq(r, pair[1].record));
                prop_assert!(first < second);
            }
        }
    }

    #[test]
    fn prop_rank_blank_query_is_empty(records in records_strategy(), blank in "[ \t]{0,4}") {
        let engine = SmartSearch::new();
        prop_assert!(engine.rank(&records, &blank, &SearchOptions::new(["name"])).is_empty());
    }

    #[test]
    fn prop_suggestions_bounded_and_longer(
        records in records_strategy(),
        query in "[a-z]{1,4}",
        max in 0usize..8,
    ) {
        let engine = SmartSearch::new();
        let suggestions = engine.suggest(&records, &query, &["name"], max);

        prop_assert!(suggestions.len() <= max);
        for s in &suggestions {
            prop_assert!(s.chars().count() > query.chars().count());
        }
        let mut unique = suggestions.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), suggestions.len());
    }

    #[test]
    fn prop_history_dedupes_and_caps(queries in prop::collection::vec(word_strategy(), 1..30)) {
        let mut history = SearchHistory::new(MemoryStore::new());
        for q in &queries {
            history.add(q).unwrap();
        }
        let entries = history.get_history();

        prop_assert!(entries.len() <= 10);
        prop_assert_eq!(&entries[0], queries.last().unwrap());
        let mut unique = entries.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), entries.len());
    }
}

#[test]
fn test_readding_moves_to_front_once() {
    let mut history = SearchHistory::new(MemoryStore::new());
    history.add("basmati").unwrap();
    history.add("jaggery").unwrap();
    history.add("basmati").unwrap();
    history.add("basmati").unwrap();

    let entries = history.get_history();
    assert_eq!(entries[0], "basmati");
    assert_eq!(entries.iter().filter(|e| *e == "basmati").count(), 1);
}

#[test]
fn test_eleven_distinct_queries_evict_oldest() {
    let mut history = SearchHistory::new(MemoryStore::new());
    let queries: Vec<String> = (1..=11).map(|i| format!("q{}", i)).collect();
    for q in &queries {
        history.add(q).unwrap();
    }

    let entries = history.get_history();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0], "q11");
    assert_eq!(entries[9], "q2");
    assert!(!entries.contains(&"q1".to_string()));
}
