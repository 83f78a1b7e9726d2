//! Advanced filters over records
//!
//! Every dimension is optional; an absent dimension constrains nothing.
//! Records must satisfy all active dimensions. Values that cannot be parsed
//! fall back to 0 (price) or the Unix epoch (date), so such records fail
//! range filters instead of erroring.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::Searchable;

/// Field holding the category identifier
pub const CATEGORY_FIELD: &str = "category_id";
/// Field holding the subcategory identifier
pub const SUBCATEGORY_FIELD: &str = "subcategory_id";
/// Price fields, in lookup order
pub const PRICE_FIELDS: &[&str] = &["price", "amount"];
/// Status field
pub const STATUS_FIELD: &str = "status";
/// Date fields, in lookup order
pub const DATE_FIELDS: &[&str] = &["created_at", "date"];
/// Tags field
pub const TAGS_FIELD: &str = "tags";

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Inclusive time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Advanced search filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedFilters {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price_range: Option<PriceRange>,
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
    pub tags: Option<Vec<String>>,
}

impl AdvancedFilters {
    /// Whether no dimension is constrained
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subcategory.is_none()
            && self.price_range.is_none()
            && self.status.is_none()
            && self.date_range.is_none()
            && self.tags.as_ref().map_or(true, |t| t.is_empty())
    }

    /// Whether `record` satisfies every active dimension
    pub fn matches<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        if let Some(category) = &self.category {
            if record.field(CATEGORY_FIELD).as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if let Some(subcategory) = &self.subcategory {
            if record.field(SUBCATEGORY_FIELD).as_deref() != Some(subcategory.as_str()) {
                return false;
            }
        }

        if let Some(range) = &self.price_range {
            let price = record_price(record);
            if price < range.min || price > range.max {
                return false;
            }
        }

        if let Some(status) = &self.status {
            if record.field(STATUS_FIELD).as_deref() != Some(status.as_str()) {
                return false;
            }
        }

        if let Some(range) = &self.date_range {
            let date = record_date(record);
            if date < range.start || date > range.end {
                return false;
            }
        }

        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            let record_tags = record
                .field(TAGS_FIELD)
                .map(|t| t.to_lowercase())
                .unwrap_or_default();
            if !tags
                .iter()
                .any(|tag| record_tags.contains(&tag.to_lowercase()))
            {
                return false;
            }
        }

        true
    }
}

/// Keep the records that satisfy `filters`, in their original order
pub fn apply_filters<'a, R: Searchable>(records: &'a [R], filters: &AdvancedFilters) -> Vec<&'a R> {
    let kept: Vec<&R> = records.iter().filter(|r| filters.matches(*r)).collect();
    tracing::debug!("Filters kept {} of {} records", kept.len(), records.len());
    kept
}

/// First non-empty value among `names`
fn first_field<R: Searchable + ?Sized>(record: &R, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| record.field(name))
        .find(|value| !value.trim().is_empty())
        .map(|value| value.into_owned())
}

/// Record price, 0.0 when missing or unparseable.
///
/// A price that reads as zero falls through to the next price field.
pub fn record_price<R: Searchable + ?Sized>(record: &R) -> f64 {
    PRICE_FIELDS
        .iter()
        .filter_map(|name| record.field(name))
        .filter_map(|value| parse_leading_number(&value))
        .find(|price| *price != 0.0)
        .unwrap_or(0.0)
}

/// Record date, the Unix epoch when missing or unparseable
pub fn record_date<R: Searchable + ?Sized>(record: &R) -> DateTime<Utc> {
    first_field(record, DATE_FIELDS)
        .and_then(|value| parse_date(&value))
        .unwrap_or_else(epoch)
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from(std::time::UNIX_EPOCH)
}

/// Parse the numeric prefix of a string: `"12.50 USD"` is 12.5.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
    let re = NUMBER
        .get_or_init(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").ok())
        .as_ref()?;

    re.find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Parse an integer as Unix milliseconds, or RFC 3339,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(millis) = s.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
