//! Domain synonym table
//!
//! The table is a plain value: build it once (usually [`SynonymTable::default`],
//! the built-in product vocabulary) and hand it to the engine. Keys and
//! synonyms are stored lower-cased.

use std::collections::HashMap;

/// Built-in product vocabulary
const PRODUCT_SYNONYMS: &[(&str, &[&str])] = &[
    ("onion", &["bulb", "allium", "vegetable", "fresh produce"]),
    ("onions", &["bulbs", "alliums", "vegetables", "fresh produce"]),
    ("spice", &["seasoning", "condiment", "flavoring", "herb"]),
    ("spices", &["seasonings", "condiments", "flavorings", "herbs"]),
    ("powder", &["ground", "dried", "processed"]),
    ("powders", &["ground", "dried", "processed"]),
    ("fresh", &["raw", "natural", "organic", "unprocessed"]),
    ("dried", &["dehydrated", "preserved", "processed"]),
    ("organic", &["natural", "eco-friendly", "sustainable"]),
    ("export", &["international", "global", "overseas", "foreign"]),
    ("import", &["international", "global", "overseas", "foreign"]),
    ("trade", &["commerce", "business", "exchange", "trading"]),
    ("agriculture", &["farming", "cultivation", "crop", "produce"]),
    ("food", &["edible", "consumable", "nutrition", "sustenance"]),
    ("quality", &["premium", "grade", "standard", "excellence"]),
    ("certified", &["verified", "approved", "validated", "accredited"]),
    ("fssai", &["food safety", "regulatory", "certification"]),
    ("apeda", &["agricultural", "export", "development", "authority"]),
    ("iso", &["international", "standard", "organization", "certification"]),
    ("gst", &["goods", "services", "tax", "indirect tax"]),
    ("iec", &["import", "export", "code", "registration"]),
];

/// Immutable mapping from a domain term to related terms.
///
/// Entries keep insertion order so lookups are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_pairs(
            PRODUCT_SYNONYMS
                .iter()
                .map(|(term, synonyms)| (*term, synonyms.iter().copied())),
        )
    }
}

impl SynonymTable {
    /// A table with no entries; synonym matching never fires.
    pub fn empty() -> Self {
        SynonymTable {
            entries: Vec::new(),
        }
    }

    /// Build a table from `(term, synonyms)` pairs.
    ///
    /// A term listed twice has its synonyms merged into the first entry.
    pub fn from_pairs<T, I, S>(pairs: impl IntoIterator<Item = (T, I)>) -> Self
    where
        T: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::empty();
        for (term, synonyms) in pairs {
            table.insert(term.as_ref(), synonyms);
        }
        table
    }

    /// Return a copy of this table with extra entries merged in.
    pub fn extended(mut self, extra: &HashMap<String, Vec<String>>) -> Self {
        // Sort for a stable order regardless of map iteration
        let mut terms: Vec<&String> = extra.keys().collect();
        terms.sort();
        for term in terms {
            self.insert(term, &extra[term]);
        }
        self
    }

    fn insert<I, S>(&mut self, term: &str, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return;
        }

        let synonyms = synonyms
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty());

        match self.entries.iter_mut().find(|(t, _)| *t == term) {
            Some((_, existing)) => {
                for synonym in synonyms {
                    if !existing.contains(&synonym) {
                        existing.push(synonym);
                    }
                }
            }
            None => self.entries.push((term, synonyms.collect())),
        }
    }

    /// Number of terms in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no terms
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Synonyms for an exact (case-insensitive) term
    pub fn get(&self, term: &str) -> Option<&[String]> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .find(|(t, _)| *t == term)
            .map(|(_, synonyms)| synonyms.as_slice())
    }

    /// Whether `text` contains a synonym of any term contained in `query`.
    ///
    /// Both sides are compared lower-cased.
    pub fn matches(&self, query: &str, text: &str) -> bool {
        let query = query.to_lowercase();
        let text = text.to_lowercase();

        self.entries
            .iter()
            .filter(|(term, _)| query.contains(term.as_str()))
            .any(|(_, synonyms)| synonyms.iter().any(|s| text.contains(s.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_product_terms() {
        let table = SynonymTable::default();
        assert_eq!(table.len(), PRODUCT_SYNONYMS.len());
        assert_eq!(
            table.get("Onion").unwrap(),
            &["bulb", "allium", "vegetable", "fresh produce"]
        );
    }

    #[test]
    fn test_matches_query_term_against_synonym() {
        let table = SynonymTable::default();
        assert!(table.matches("onion", "Fresh bulb vegetables"));
        assert!(table.matches("Red ONION", "BULB"));
        assert!(!table.matches("onion", "Black pepper"));
    }

    #[test]
    fn test_matches_requires_known_term() {
        let table = SynonymTable::default();
        assert!(!table.matches("pepper", "bulb"));
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table = SynonymTable::empty();
        assert!(table.is_empty());
        assert!(!table.matches("onion", "bulb"));
    }

    #[test]
    fn test_from_pairs_merges_duplicates() {
        let table = SynonymTable::from_pairs([
            ("Rice", vec!["basmati"]),
            ("rice", vec!["Grain", "basmati"]),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("rice").unwrap(), &["basmati", "grain"]);
    }

    #[test]
    fn test_extended_adds_terms() {
        let mut extra = HashMap::new();
        extra.insert("ginger".to_string(), vec!["rhizome".to_string()]);
        extra.insert("onion".to_string(), vec!["shallot".to_string()]);

        let table = SynonymTable::default().extended(&extra);
        assert!(table.matches("ginger", "dried rhizome"));
        assert!(table.get("onion").unwrap().contains(&"shallot".to_string()));
        assert_eq!(table.len(), PRODUCT_SYNONYMS.len() + 1);
    }
}
