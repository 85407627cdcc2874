//! # Range Query Construction
//!
//! Pushes a `[lower, upper)` restriction into the filter itself as a
//! `{key: {$gte: lower, $lt: upper}}` clause. Only a single, non-compound
//! split key can be expressed this way.

use serde_json::Value;

use crate::domain::{display_bound, is_max_key, is_min_key, Document, SplitError, GTE, LT};

/// The only key of `bound`, or `None` when it has zero or several keys.
fn single_entry(bound: &Document) -> Option<(&String, &Value)> {
    if bound.len() == 1 {
        bound.iter().next()
    } else {
        None
    }
}

/// Merge a half-open range clause for `[lower, upper)` into a copy of `query`.
///
/// Both boundaries absent yields an exact copy of `query`. A sentinel value
/// contributes no clause on its side.
///
/// # Errors
///
/// - `InvalidBoundary` if a present boundary does not have exactly one key,
///   or the two boundaries name different keys.
/// - `QueryConflict` if `query` already constrains the split key.
pub fn range_query_filter(
    lower: Option<&Document>,
    upper: Option<&Document>,
    query: &Document,
) -> Result<Document, SplitError> {
    if lower.is_none() && upper.is_none() {
        return Ok(query.clone());
    }

    let invalid = || SplitError::InvalidBoundary {
        min: display_bound(lower),
        max: display_bound(upper),
    };

    let min_entry = match lower {
        Some(bound) => Some(single_entry(bound).ok_or_else(invalid)?),
        None => None,
    };
    let max_entry = match upper {
        Some(bound) => Some(single_entry(bound).ok_or_else(invalid)?),
        None => None,
    };

    let key = match (min_entry, max_entry) {
        (Some((lo, _)), Some((hi, _))) if lo != hi => return Err(invalid()),
        (Some((key, _)), _) | (None, Some((key, _))) => key,
        (None, None) => return Ok(query.clone()),
    };

    if query.contains_key(key) {
        return Err(SplitError::QueryConflict {
            key: key.clone(),
            query: Value::Object(query.clone()).to_string(),
        });
    }

    let mut range = Document::new();
    if let Some((_, value)) = min_entry.filter(|(_, v)| !is_min_key(v)) {
        range.insert(GTE.to_string(), value.clone());
    }
    if let Some((_, value)) = max_entry.filter(|(_, v)| !is_max_key(v)) {
        range.insert(LT.to_string(), value.clone());
    }

    let mut filter = query.clone();
    if !range.is_empty() {
        filter.insert(key.clone(), Value::Object(range));
    }
    Ok(filter)
}
