//! Highlighting of the first literal query occurrence

use regex::RegexBuilder;

/// Wrap the first case-insensitive occurrence of `query` in `text` with
/// `<mark class="{class}">…</mark>`.
///
/// The query is matched literally (regex metacharacters are escaped) and the
/// matched text keeps its original casing. Text is returned unchanged when
/// the query is blank or does not occur. Nothing else in `text` is escaped.
///
/// # Examples
/// ```
/// use smartsearch::highlight;
///
/// assert_eq!(
///     highlight("Organic Turmeric Powder", "turmeric", "hl"),
///     r#"Organic <mark class="hl">Turmeric</mark> Powder"#
/// );
/// assert_eq!(highlight("Black Pepper", "turmric", "hl"), "Black Pepper");
/// ```
pub fn highlight(text: &str, query: &str, class: &str) -> String {
    if query.trim().is_empty() {
        return text.to_string();
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!("Highlight pattern rejected for {:?}: {}", query, e);
            return text.to_string();
        }
    };

    match pattern.find(text) {
        Some(m) => format!(
            "{}<mark class=\"{}\">{}</mark>{}",
            &text[..m.start()],
            class,
            m.as_str(),
            &text[m.end()..]
        ),
        None => text.to_string(),
    }
}
