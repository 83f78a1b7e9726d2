//! Autocomplete suggestions drawn from record fields

use std::collections::HashSet;

use crate::matcher::Tuning;
use crate::record::{field_text, Searchable};

/// Default number of suggestions returned
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Minimum query length (in chars) before suggestions are offered
pub const MIN_QUERY_CHARS: usize = 2;

/// Insertion-ordered set with a cap
struct Collected {
    seen: HashSet<String>,
    items: Vec<String>,
    max: usize,
}

impl Collected {
    fn new(max: usize) -> Self {
        Collected {
            seen: HashSet::new(),
            items: Vec::new(),
            max,
        }
    }

    fn add(&mut self, candidate: &str) {
        if !self.is_full() && self.seen.insert(candidate.to_string()) {
            self.items.push(candidate.to_string());
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.max
    }
}

/// Suggest completions of `query` from the given fields of `records`.
///
/// Two kinds of candidates are collected, lower-cased:
/// - whole words that start with the query and are longer than it
/// - a window of text around the first place the query occurs in a field,
///   from `tuning.suggestion_lead` chars before the match to
///   `query length + tuning.suggestion_tail` chars after its start
///
/// Candidates are deduplicated and returned in the order they were found,
/// at most `max_suggestions` of them. Queries shorter than two chars get
/// nothing.
pub fn generate_suggestions<R, S>(
    records: &[R],
    query: &str,
    fields: &[S],
    max_suggestions: usize,
    tuning: &Tuning,
) -> Vec<String>
where
    R: Searchable,
    S: AsRef<str>,
{
    if query.trim().is_empty() || query.chars().count() < MIN_QUERY_CHARS || max_suggestions == 0 {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    // Every suggestion must be longer than the query as typed
    let min_len = needle.chars().count().max(query.chars().count());
    let mut collected = Collected::new(max_suggestions);

    'records: for record in records {
        for field in fields {
            if collected.is_full() {
                break 'records;
            }

            let text = field_text(record, field.as_ref()).to_lowercase();
            if text.is_empty() {
                continue;
            }

            for word in text.split_whitespace() {
                if word.starts_with(&needle) && word.chars().count() > min_len {
                    collected.add(word);
                }
            }

            if let Some(window) = match_window(&text, &needle, tuning) {
                if window.chars().count() > min_len {
                    collected.add(&window);
                }
            }
        }
    }

    collected.items
}

/// Trimmed text around the first occurrence of `needle` in `text`
fn match_window(text: &str, needle: &str, tuning: &Tuning) -> Option<String> {
    let byte_pos = text.find(needle)?;

    let chars: Vec<char> = text.chars().collect();
    let pos = text[..byte_pos].chars().count();
    let start = pos.saturating_sub(tuning.suggestion_lead);
    let end = (pos + needle.chars().count() + tuning.suggestion_tail).min(chars.len());

    let window: String = chars[start..end].iter().collect();
    Some(window.trim().to_string())
}
