//! # Splitter Core
//!
//! Partitions a large remote collection into independent, boundary-defined
//! input splits so a parallel framework can scan it concurrently with no
//! duplicated and no missed rows.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Split Modes
//!
//! | Mode | Restriction | Scan requirement |
//! |------|-------------|------------------|
//! | Index bounds | explicit `min`/`max` documents | index-range scan support |
//! | Range query | `{key: {$gte, $lt}}` merged into the filter | none; single split key only |
//!
//! ## Strategies
//!
//! - `Single`: one split over the whole collection
//! - `ShardChunks`: one split per chunk in `config.chunks`, optionally read
//!   straight from the owning shard
//! - `SplitVector`: split points from the `splitVector` command
//! - `Auto`: chunks when the collection is sharded, split vector otherwise
//!
//! ## Module Structure
//!
//! ```text
//! splitter-core/
//! ├── domain/          # Documents, descriptors, InputSplit, config, errors
//! ├── algorithms/      # Range query, split factory, URI rewrite, strategies
//! ├── ports/           # API trait + cluster client/connector traits
//! ├── adapters/        # In-memory cluster
//! └── service/         # CollectionSplitter
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = SplitterConfig::from_env()?;
//! let splitter = CollectionSplitter::init(config, &connector).await?;
//! let splits = splitter.calculate_splits().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryCluster;
pub use algorithms::{
    calculate_shard_chunk_splits, calculate_split_vector_splits, get_shards_map,
    normalize_shard_host, range_query_filter, rewrite_uri, SplitFactory,
};
pub use domain::{
    invariant_contiguous_chunks, is_max_key, is_min_key, max_key, min_key, ChunkRange,
    ConnectionUri, Document, InputSplit, Namespace, ShardMap, SplitBounds, SplitError,
    SplitResult, SplitStrategy, SplitterConfig, MONGODB_PREFIX,
};
pub use ports::{ClusterClient, Connector, SplitterApi};
pub use service::CollectionSplitter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
