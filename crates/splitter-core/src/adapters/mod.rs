//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits.

mod in_memory_cluster;

pub use in_memory_cluster::InMemoryCluster;
