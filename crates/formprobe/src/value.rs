//! Value semantics shared by the fill, preview and compare behaviors.
//!
//! Record attributes are opaque [`serde_json::Value`]s; these helpers define
//! how those values are cast to on-page text, tested for truthiness and
//! emptiness, projected out of relationship collections, and compared under
//! each field kind's equality rules.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Canonical storage format for date-time attribute values
pub const DATETIME_STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-field association from a raw value (string-cast) to the
/// human-readable text the UI renders for it
pub type DisplayMap = BTreeMap<String, Value>;

/// Cast a value to the text a plain input would hold for it.
///
/// Scalars render without JSON quoting; null renders empty, matching what an
/// unset attribute looks like on the page. Arrays and objects fall back to
/// their JSON serialization.
#[must_use]
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Boolean interpretation of a record value
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Parse a rendered checked-state attribute such as `aria-checked`
#[must_use]
pub fn parse_checked_attribute(attr: Option<&str>) -> bool {
    matches!(attr, Some("true" | "1" | "on" | "yes"))
}

/// Whether a value counts as empty for placeholder purposes: null, empty
/// string, false, zero, or an empty collection
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Loose scalar equality: structurally equal, or equal after string casting
/// (so `1` matches `"1"` the way storage round-trips tend to)
#[must_use]
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    a == b || to_display_string(a) == to_display_string(b)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut canonical: Vec<Value> = items.iter().map(canonicalize).collect();
            canonical.sort_by_cached_key(|v| v.to_string());
            Value::Array(canonical)
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        other => other.clone(),
    }
}

/// Deep equality ignoring array order and object key order
#[must_use]
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Coerce a structured value: JSON text parses to its structure, everything
/// else passes through. Key-value and code-editor attributes may be persisted
/// either as structures or as serialized strings.
#[must_use]
pub fn coerce_structured(value: &Value) -> Value {
    if let Value::String(s) = value {
        if let Ok(parsed) = serde_json::from_str::<Value>(s) {
            return parsed;
        }
    }
    value.clone()
}

/// The structured entries of a key-value attribute, in stored entry order
/// (the order the page renders its rows in)
#[must_use]
pub fn key_value_entries(value: &Value) -> Vec<(String, Value)> {
    match coerce_structured(value) {
        Value::Object(map) => map.into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Identifier keys of a relationship value.
///
/// A relationship attribute may hold a collection of related records (objects
/// carrying an `id`), a bare list of identifiers, or a single one of either.
#[must_use]
pub fn relation_keys(value: &Value) -> Vec<String> {
    fn key_of(item: &Value) -> String {
        match item {
            Value::Object(map) => map.get("id").map(to_display_string).unwrap_or_default(),
            other => to_display_string(other),
        }
    }

    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(key_of).collect(),
        single => vec![key_of(single)],
    }
}

/// Project the title attribute out of a relationship collection, for
/// order-insensitive comparison of relation-backed checkbox lists
#[must_use]
pub fn title_projection(value: &Value, title_attribute: &str) -> Value {
    let items = match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        single => vec![single.clone()],
    };
    Value::Array(
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map.get(title_attribute).cloned().unwrap_or(Value::Null),
                other => other.clone(),
            })
            .collect(),
    )
}

/// Direct membership of a rendered option value in a plain array attribute
#[must_use]
pub fn plain_membership(value: &Value, item: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|v| to_display_string(v) == item),
        Value::Null => false,
        single => to_display_string(single) == item,
    }
}

/// Strip one layer of wrapping markup that the rich text editor adds around
/// single-paragraph content: the text after the first `<p>` and before the
/// last `</p>`. Either marker being absent leaves that side untouched.
/// Multi-paragraph content keeps its inner markers; its comparison behavior
/// is a known edge case.
#[must_use]
pub fn strip_rich_text_wrap(html: &str) -> &str {
    let after = html.find("<p>").map_or(html, |i| &html[i + 3..]);
    after.rfind("</p>").map_or(after, |i| &after[..i])
}

/// Parse a date-time attribute value. Accepts the canonical storage format,
/// an ISO `T` separator, and bare dates (midnight).
#[must_use]
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    let text = match value {
        Value::String(s) if !s.is_empty() => s.as_str(),
        _ => return None,
    };
    NaiveDateTime::parse_from_str(text, DATETIME_STORAGE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Canonical date-time string for null-safe comparison
#[must_use]
pub fn canonical_datetime(value: &Value) -> Option<String> {
    parse_datetime(value).map(|dt| dt.format(DATETIME_STORAGE_FORMAT).to_string())
}

/// Format a date-time value with a display format; empty values render empty
#[must_use]
pub fn format_datetime_display(value: &Value, format: &str) -> String {
    parse_datetime(value).map_or_else(String::new, |dt| dt.format(format).to_string())
}
