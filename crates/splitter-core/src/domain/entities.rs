//! # Domain Entities
//!
//! The split descriptor handed to scan workers, and the shard map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::connection::ConnectionUri;
use super::document::Document;
use super::errors::SplitError;

/// Shard name → endpoint (comma-joined `host:port` list).
pub type ShardMap = BTreeMap<String, String>;

/// How a split restricts its key range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitBounds {
    /// The restriction (if any) is already merged into the split's filter.
    RangeQuery,
    /// Explicit index bounds consumed by the scan as `min`/`max`.
    /// An absent side means the scan is open on that side.
    IndexBounds {
        /// Inclusive lower index bound.
        min: Option<Document>,
        /// Exclusive upper index bound.
        max: Option<Document>,
    },
}

/// One unit of parallel scan work.
///
/// Built once by the split factory and never mutated afterwards; the
/// `with_input_uri` helper returns a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSplit {
    /// Where the scan connects (possibly steered at one shard).
    pub input_uri: ConnectionUri,
    /// Where the scan authenticates.
    pub auth_uri: Option<ConnectionUri>,
    /// Effective filter.
    pub query: Document,
    /// Fields to return.
    pub fields: Option<Document>,
    /// Sort order.
    pub sort: Option<Document>,
    /// Disable the server-side cursor timeout.
    pub no_timeout: bool,
    /// Key-range restriction mode.
    pub bounds: SplitBounds,
}

impl InputSplit {
    /// Copy of this split targeting another descriptor.
    pub fn with_input_uri(&self, input_uri: ConnectionUri) -> Self {
        Self {
            input_uri,
            ..self.clone()
        }
    }

    /// Index-bound minimum, if this split is in boundary-marker mode.
    pub fn min(&self) -> Option<&Document> {
        match &self.bounds {
            SplitBounds::IndexBounds { min, .. } => min.as_ref(),
            SplitBounds::RangeQuery => None,
        }
    }

    /// Index-bound maximum, if this split is in boundary-marker mode.
    pub fn max(&self) -> Option<&Document> {
        match &self.bounds {
            SplitBounds::IndexBounds { max, .. } => max.as_ref(),
            SplitBounds::RangeQuery => None,
        }
    }

    /// Serialize for shipping to a worker.
    pub fn to_json(&self) -> Result<String, SplitError> {
        serde_json::to_string(self)
            .map_err(|e| SplitError::SplitComputation(format!("cannot encode split: {}", e)))
    }

    /// Decode a split shipped by [`InputSplit::to_json`].
    pub fn from_json(text: &str) -> Result<Self, SplitError> {
        serde_json::from_str(text)
            .map_err(|e| SplitError::SplitComputation(format!("cannot decode split: {}", e)))
    }
}
