//! # Domain Invariants
//!
//! Rules a boundary chain must satisfy before it is turned into splits.

use serde_json::Value;

use super::document::{display_bound, is_max_key, is_min_key, Document};
use super::errors::SplitError;

/// A `[min, max)` pair read from partition metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkRange {
    /// Inclusive lower boundary.
    pub min: Document,
    /// Exclusive upper boundary.
    pub max: Document,
}

fn all_keys(doc: &Document, pred: fn(&Value) -> bool) -> bool {
    !doc.is_empty() && doc.values().all(pred)
}

/// Invariant: chunks cover the full key space with no gaps and no overlaps.
///
/// The first chunk starts at the absolute minimum on every key, each chunk's
/// max equals the next chunk's min, and the last chunk ends at the absolute
/// maximum on every key.
pub fn invariant_contiguous_chunks(chunks: &[ChunkRange]) -> Result<(), SplitError> {
    let (first, last) = match (chunks.first(), chunks.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(SplitError::SplitComputation(
                "no chunks to cover the key space".to_string(),
            ))
        }
    };

    if !all_keys(&first.min, is_min_key) {
        return Err(SplitError::SplitComputation(format!(
            "first chunk does not start at the minimum key: {}",
            display_bound(Some(&first.min))
        )));
    }

    if !all_keys(&last.max, is_max_key) {
        return Err(SplitError::SplitComputation(format!(
            "last chunk does not end at the maximum key: {}",
            display_bound(Some(&last.max))
        )));
    }

    for pair in chunks.windows(2) {
        if pair[0].max != pair[1].min {
            return Err(SplitError::SplitComputation(format!(
                "chunk boundaries are not contiguous: {} -> {}",
                display_bound(Some(&pair[0].max)),
                display_bound(Some(&pair[1].min))
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{max_key, min_key};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn chunk(min: Value, max: Value) -> ChunkRange {
        ChunkRange {
            min: doc(json!({ "_id": min })),
            max: doc(json!({ "_id": max })),
        }
    }

    #[test]
    fn test_contiguous_chain_accepted() {
        let chunks = vec![
            chunk(min_key(), json!(10)),
            chunk(json!(10), json!(20)),
            chunk(json!(20), max_key()),
        ];
        assert!(invariant_contiguous_chunks(&chunks).is_ok());
    }

    #[test]
    fn test_single_chunk_whole_range() {
        assert!(invariant_contiguous_chunks(&[chunk(min_key(), max_key())]).is_ok());
    }

    #[test]
    fn test_gap_rejected() {
        let chunks = vec![chunk(min_key(), json!(10)), chunk(json!(11), max_key())];
        assert!(matches!(
            invariant_contiguous_chunks(&chunks),
            Err(SplitError::SplitComputation(_))
        ));
    }

    #[test]
    fn test_open_ends_required() {
        let missing_min = vec![chunk(json!(0), max_key())];
        assert!(invariant_contiguous_chunks(&missing_min).is_err());

        let missing_max = vec![chunk(min_key(), json!(99))];
        assert!(invariant_contiguous_chunks(&missing_max).is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(invariant_contiguous_chunks(&[]).is_err());
    }
}
