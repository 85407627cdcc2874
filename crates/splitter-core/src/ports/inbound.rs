//! # Inbound Ports
//!
//! API trait defining what the splitter offers to the job-setup phase.

use async_trait::async_trait;

use crate::domain::{Document, InputSplit, ShardMap, SplitError};

/// Splitter API - inbound port.
#[async_trait]
pub trait SplitterApi: Send + Sync {
    /// Compute the ordered split sequence covering the whole collection.
    ///
    /// Either the complete sequence is returned or an error; never a prefix.
    async fn calculate_splits(&self) -> Result<Vec<InputSplit>, SplitError>;

    /// Shard name → endpoint, read from partition metadata.
    async fn get_shards_map(&self) -> Result<ShardMap, SplitError>;

    /// Build one split between `lower` and `upper`.
    fn create_split_from_bounds(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
    ) -> Result<InputSplit, SplitError>;

    /// Build one split whose filter carries the `[lower, upper)` range clause.
    fn create_range_query_split(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
        query: &Document,
    ) -> Result<InputSplit, SplitError>;
}
