//! # Outbound Ports
//!
//! Traits for the external collaborators: the metadata/command client and
//! the connector that resolves a descriptor into one.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{ConnectionUri, Document, Namespace, SplitError};

/// Database holding partition metadata.
pub const CONFIG_DATABASE: &str = "config";

/// Collection of shard records (`{_id, host}`).
pub const SHARDS_COLLECTION: &str = "shards";

/// Collection of chunk records (`{ns | uuid, min, max, shard}`).
pub const CHUNKS_COLLECTION: &str = "chunks";

/// Collection of sharded-collection records (`{_id: ns, uuid?, dropped?}`).
pub const COLLECTIONS_COLLECTION: &str = "collections";

/// Read-only client against the source cluster.
///
/// Calls are issued one at a time by the splitter. A query that times out
/// must fail rather than block indefinitely.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Return every document of `namespace` matching `filter`, ordered by `sort`.
    async fn find(
        &self,
        namespace: &Namespace,
        filter: &Document,
        sort: Option<&Document>,
    ) -> Result<Vec<Document>, SplitError>;

    /// Run a database command and return its reply document.
    async fn run_command(&self, database: &str, command: &Document)
        -> Result<Document, SplitError>;

    /// Whether this connection is already authenticated against `database`.
    async fn is_authenticated(&self, database: &str) -> bool;

    /// Authenticate against `database`.
    async fn authenticate(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<(), SplitError>;
}

/// Resolves a connection descriptor into a live client.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to the cluster addressed by `uri`.
    async fn connect(&self, uri: &ConnectionUri) -> Result<Arc<dyn ClusterClient>, SplitError>;
}
