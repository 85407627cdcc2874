//! # Split Factory
//!
//! Turns a boundary pair into a finished [`InputSplit`], either by merging a
//! range clause into the filter or by attaching explicit index bounds.

use serde_json::Value;

use super::range_query::range_query_filter;
use crate::domain::{
    is_max_key, is_min_key, Document, InputSplit, SplitBounds, SplitError, SplitterConfig,
};

/// Builds splits stamped with one configuration's routing and read options.
#[derive(Clone, Copy, Debug)]
pub struct SplitFactory<'a> {
    config: &'a SplitterConfig,
}

impl<'a> SplitFactory<'a> {
    /// Factory for `config`.
    pub fn new(config: &'a SplitterConfig) -> Self {
        Self { config }
    }

    /// Build a split between `lower` and `upper`.
    ///
    /// With range queries enabled the bounds become a filter clause and any
    /// failure is reported as `SplitFailed`; the split is never downgraded to
    /// index bounds. Otherwise sentinel values are trimmed and the remaining
    /// keys are attached as index bounds.
    pub fn create_split_from_bounds(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
    ) -> Result<InputSplit, SplitError> {
        if self.config.use_range_query() {
            let query = self.config.query().cloned().unwrap_or_default();
            return self
                .create_range_query_split(lower, upper, &query)
                .map_err(SplitError::split_failed);
        }

        let bounds = SplitBounds::IndexBounds {
            min: trim_sentinels(lower, is_min_key),
            max: trim_sentinels(upper, is_max_key),
        };
        let query = self.config.query().cloned().unwrap_or_default();
        Ok(self.stamp(query, bounds))
    }

    /// Build a split whose filter is `query` plus the `[lower, upper)` clause.
    pub fn create_range_query_split(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
        query: &Document,
    ) -> Result<InputSplit, SplitError> {
        let filter = range_query_filter(lower, upper, query)?;
        Ok(self.stamp(filter, SplitBounds::RangeQuery))
    }

    fn stamp(&self, query: Document, bounds: SplitBounds) -> InputSplit {
        InputSplit {
            input_uri: self.config.input_uri().clone(),
            auth_uri: self.config.auth_uri().cloned(),
            query,
            fields: self.config.fields().cloned(),
            sort: self.config.sort().cloned(),
            no_timeout: self.config.no_timeout(),
            bounds,
        }
    }
}

/// Copy of `bound` without the keys whose value is a sentinel.
/// A boundary left with no keys is treated as absent.
fn trim_sentinels(bound: Option<&Document>, is_sentinel: fn(&Value) -> bool) -> Option<Document> {
    let trimmed: Document = bound?
        .iter()
        .filter(|(_, value)| !is_sentinel(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
