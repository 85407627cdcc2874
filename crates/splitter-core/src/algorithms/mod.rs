//! # Algorithms Module
//!
//! Boundary → split conversion, descriptor rewriting, shard map and the
//! concrete split strategies.

pub mod range_query;
pub mod shard_chunks;
pub mod shard_map;
pub mod split_factory;
pub mod split_vector;
pub mod uri_rewrite;

pub use range_query::range_query_filter;
pub use shard_chunks::{
    calculate_shard_chunk_splits, order_chunks, read_chunks, sharded_collection_record, ShardChunk,
};
pub use shard_map::{get_shards_map, normalize_shard_host};
pub use split_factory::SplitFactory;
pub use split_vector::{calculate_split_vector_splits, parse_split_keys, split_vector_command};
pub use uri_rewrite::rewrite_uri;
