//! Generic field access over caller-defined records
//!
//! The engine has no fixed schema. Anything that can hand back a field's text
//! by name can be searched, filtered and suggested over.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{Error, Result};

/// A record whose fields can be read as text by name.
///
/// Returning `None` means the field is absent (or null); the engine treats
/// that exactly like empty text.
///
/// # Examples
/// ```
/// use std::borrow::Cow;
/// use smartsearch::Searchable;
///
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// impl Searchable for Product {
///     fn field(&self, name: &str) -> Option<Cow<'_, str>> {
///         match name {
///             "name" => Some(Cow::Borrowed(&self.name)),
///             "price" => Some(Cow::Owned(self.price.to_string())),
///             _ => None,
///         }
///     }
/// }
///
/// let p = Product { name: "Basmati Rice".into(), price: 12.5 };
/// assert_eq!(p.field("name").as_deref(), Some("Basmati Rice"));
/// assert_eq!(p.field("color"), None);
/// ```
pub trait Searchable {
    /// Text of the named field, if present
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).field(name)
    }
}

impl Searchable for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(json_text)
    }
}

impl Searchable for serde_json::Value {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => None,
        }
    }
}

impl Searchable for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

impl Searchable for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

/// Render a JSON value as field text.
///
/// Strings are borrowed, scalars are formatted, arrays of scalars are joined
/// with `", "` (so a `tags: ["organic", "spice"]` array reads like a tag
/// string). Null and objects have no text.
fn json_text(value: &serde_json::Value) -> Option<Cow<'_, str>> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Array(items) => {
            let parts: Vec<Cow<'_, str>> = items.iter().filter_map(json_text).collect();
            Some(Cow::Owned(parts.join(", ")))
        }
    }
}

/// Integral floats print without a fraction, so `2.0` reads as `"2"`
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Field text with absent fields read as empty
pub(crate) fn field_text<'a, R: Searchable + ?Sized>(record: &'a R, name: &str) -> Cow<'a, str> {
    record.field(name).unwrap_or(Cow::Borrowed(""))
}

/// Load records from a JSON array file or a JSON Lines (`.jsonl`) file.
///
/// Blank lines in JSON Lines input are skipped.
pub fn load_records(path: &Path) -> Result<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let records = match ext.as_str() {
        "jsonl" | "ndjson" => parse_jsonl(&text)?,
        _ => parse_json_array(&text)?,
    };

    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_json_array(text: &str) -> Result<Vec<serde_json::Value>> {
    match serde_json::from_str(text)? {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(Error::Other(
            "expected a JSON array of records".to_string(),
        )),
    }
}

fn parse_jsonl(text: &str) -> Result<Vec<serde_json::Value>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}
