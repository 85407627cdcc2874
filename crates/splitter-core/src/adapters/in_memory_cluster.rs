//! In-Memory Cluster Adapter
//!
//! Implements `ClusterClient` and `Connector` over seeded collections.
//! Used by tests and for dry runs of a split calculation.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{ConnectionUri, Document, Namespace, SplitError};
use crate::ports::{ClusterClient, Connector};

#[derive(Default)]
struct ClusterState {
    collections: HashMap<Namespace, Vec<Document>>,
    /// (database, command name) → reply.
    replies: HashMap<(String, String), Document>,
    commands_run: Vec<(String, Document)>,
    /// (database, username) → password.
    users: HashMap<(String, String), String>,
    authenticated: HashSet<String>,
    auth_attempts: usize,
    failing_reads: HashMap<Namespace, String>,
    refuse_connections: Option<String>,
    connected: Vec<String>,
    reads: Vec<Namespace>,
}

/// Cluster held entirely in memory.
///
/// Clones share state, so a handle kept by a test observes what the splitter
/// did through its own connection. `find` matches top-level equality filters
/// and returns documents in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryCluster {
    state: Arc<RwLock<ClusterState>>,
}

impl InMemoryCluster {
    /// Create an empty cluster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append documents to a collection.
    pub fn insert(&self, namespace: &Namespace, docs: Vec<Document>) {
        self.state
            .write()
            .collections
            .entry(namespace.clone())
            .or_default()
            .extend(docs);
    }

    /// Register the reply for a command on a database.
    pub fn set_command_reply(&self, database: &str, command: &str, reply: Document) {
        self.state
            .write()
            .replies
            .insert((database.to_string(), command.to_string()), reply);
    }

    /// Register a successful `splitVector` reply.
    pub fn set_split_keys(&self, database: &str, keys: Vec<Document>) {
        let mut reply = Document::new();
        reply.insert(
            "splitKeys".to_string(),
            Value::Array(keys.into_iter().map(Value::Object).collect()),
        );
        reply.insert("ok".to_string(), Value::from(1.0));
        self.set_command_reply(database, "splitVector", reply);
    }

    /// Register a user able to authenticate against `database`.
    pub fn add_user(&self, database: &str, username: &str, password: &str) {
        self.state.write().users.insert(
            (database.to_string(), username.to_string()),
            password.to_string(),
        );
    }

    /// Mark `database` as already authenticated.
    pub fn mark_authenticated(&self, database: &str) {
        self.state.write().authenticated.insert(database.to_string());
    }

    /// Make every read from `namespace` fail with `reason`.
    pub fn fail_reads_from(&self, namespace: &Namespace, reason: &str) {
        self.state
            .write()
            .failing_reads
            .insert(namespace.clone(), reason.to_string());
    }

    /// Make `connect` fail with `reason`.
    pub fn refuse_connections(&self, reason: &str) {
        self.state.write().refuse_connections = Some(reason.to_string());
    }

    /// Number of `authenticate` calls received.
    pub fn auth_attempts(&self) -> usize {
        self.state.read().auth_attempts
    }

    /// Commands received, with the database they ran on.
    pub fn commands_run(&self) -> Vec<(String, Document)> {
        self.state.read().commands_run.clone()
    }

    /// Number of `find` calls issued against `namespace`.
    pub fn reads_from(&self, namespace: &Namespace) -> usize {
        self.state
            .read()
            .reads
            .iter()
            .filter(|ns| *ns == namespace)
            .count()
    }

    /// Host lists of every accepted connection.
    pub fn connected_hosts(&self) -> Vec<String> {
        self.state.read().connected.clone()
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

#[async_trait]
impl ClusterClient for InMemoryCluster {
    async fn find(
        &self,
        namespace: &Namespace,
        filter: &Document,
        _sort: Option<&Document>,
    ) -> Result<Vec<Document>, SplitError> {
        debug!("[splitter] in-memory find on {}", namespace);
        let mut state = self.state.write();
        state.reads.push(namespace.clone());

        if let Some(reason) = state.failing_reads.get(namespace) {
            return Err(SplitError::MetadataRead(format!(
                "read from {} failed: {}",
                namespace, reason
            )));
        }

        Ok(state
            .collections
            .get(namespace)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn run_command(
        &self,
        database: &str,
        command: &Document,
    ) -> Result<Document, SplitError> {
        let mut state = self.state.write();
        state
            .commands_run
            .push((database.to_string(), command.clone()));

        let name = command.keys().next().cloned().unwrap_or_default();
        if let Some(reply) = state.replies.get(&(database.to_string(), name.clone())) {
            return Ok(reply.clone());
        }

        let mut reply = Document::new();
        reply.insert("ok".to_string(), Value::from(0.0));
        reply.insert(
            "errmsg".to_string(),
            Value::from(format!("no such command: '{}'", name)),
        );
        Ok(reply)
    }

    async fn is_authenticated(&self, database: &str) -> bool {
        self.state.read().authenticated.contains(database)
    }

    async fn authenticate(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<(), SplitError> {
        let mut state = self.state.write();
        state.auth_attempts += 1;

        let known = state
            .users
            .get(&(database.to_string(), username.to_string()))
            .map(|expected| expected == password)
            .unwrap_or(false);

        if !known {
            return Err(SplitError::Authentication {
                database: database.to_string(),
                reason: format!("credentials rejected for user '{}'", username),
            });
        }

        state.authenticated.insert(database.to_string());
        Ok(())
    }
}

#[async_trait]
impl Connector for InMemoryCluster {
    async fn connect(&self, uri: &ConnectionUri) -> Result<Arc<dyn ClusterClient>, SplitError> {
        let mut state = self.state.write();
        if let Some(reason) = &state.refuse_connections {
            return Err(SplitError::Connection(format!(
                "cannot reach {}: {}",
                uri.host_list(),
                reason
            )));
        }

        state.connected.push(uri.host_list().to_string());
        drop(state);
        Ok(Arc::new(self.clone()))
    }
}
