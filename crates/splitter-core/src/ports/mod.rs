//! # Ports
//!
//! Inbound API and outbound dependency traits.

pub mod inbound;
pub mod outbound;

pub use inbound::SplitterApi;
pub use outbound::{
    ClusterClient, Connector, CHUNKS_COLLECTION, COLLECTIONS_COLLECTION, CONFIG_DATABASE,
    SHARDS_COLLECTION,
};
