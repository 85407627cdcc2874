//! # Documents and Boundary Sentinels
//!
//! Filters, projections, sort specs and chunk boundaries are all ordered
//! key/value documents. Boundaries use the extended-JSON sentinels emitted by
//! the metadata source to mean "no real restriction on this side".

use serde_json::{Map, Value};

/// Ordered key → value mapping. Key order is preserved.
pub type Document = Map<String, Value>;

/// Extended-JSON key of the absolute minimum sentinel.
pub const MIN_KEY: &str = "$minKey";

/// Extended-JSON key of the absolute maximum sentinel.
pub const MAX_KEY: &str = "$maxKey";

/// Comparison operator for the inclusive lower bound.
pub const GTE: &str = "$gte";

/// Comparison operator for the exclusive upper bound.
pub const LT: &str = "$lt";

/// The absolute minimum sentinel value.
pub fn min_key() -> Value {
    sentinel(MIN_KEY)
}

/// The absolute maximum sentinel value.
pub fn max_key() -> Value {
    sentinel(MAX_KEY)
}

fn sentinel(name: &str) -> Value {
    let mut doc = Document::new();
    doc.insert(name.to_string(), Value::from(1));
    Value::Object(doc)
}

fn is_sentinel(value: &Value, name: &str) -> bool {
    match value {
        Value::Object(doc) => doc.len() == 1 && doc.contains_key(name),
        _ => false,
    }
}

/// True if `value` is the absolute minimum sentinel.
pub fn is_min_key(value: &Value) -> bool {
    is_sentinel(value, MIN_KEY)
}

/// True if `value` is the absolute maximum sentinel.
pub fn is_max_key(value: &Value) -> bool {
    is_sentinel(value, MAX_KEY)
}

/// Render an optional boundary for error messages.
pub fn display_bound(bound: Option<&Document>) -> String {
    match bound {
        Some(doc) => Value::Object(doc.clone()).to_string(),
        None => "null".to_string(),
    }
}

/// Parse a JSON object into a document.
pub fn parse_document(text: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(text)
}
