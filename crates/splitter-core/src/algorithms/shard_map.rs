//! # Shard Map
//!
//! Shard name → endpoint, built from the `config.shards` records.

use serde_json::Value;
use tracing::debug;

use crate::domain::{Document, Namespace, ShardMap, SplitError};
use crate::ports::{ClusterClient, CONFIG_DATABASE, SHARDS_COLLECTION};

/// Strip a replica-set prefix: `"rs0/h1:27017,h2:27017"` → `"h1:27017,h2:27017"`.
pub fn normalize_shard_host(host: &str) -> &str {
    host.split_once('/').map_or(host, |(_, hosts)| hosts)
}

/// Report any client failure on a metadata query as `MetadataRead`.
pub(crate) fn metadata_read(err: SplitError) -> SplitError {
    match err {
        SplitError::MetadataRead(_) => err,
        other => SplitError::MetadataRead(other.to_string()),
    }
}

fn string_field<'d>(record: &'d Document, field: &str) -> Result<&'d str, SplitError> {
    record.get(field).and_then(Value::as_str).ok_or_else(|| {
        SplitError::MetadataRead(format!(
            "shard record is missing string field '{}': {}",
            field,
            Value::Object(record.clone())
        ))
    })
}

/// Read every shard record and map its name to its host list.
pub async fn get_shards_map(client: &dyn ClusterClient) -> Result<ShardMap, SplitError> {
    let shards = Namespace::new(CONFIG_DATABASE, SHARDS_COLLECTION);
    let records = client
        .find(&shards, &Document::new(), None)
        .await
        .map_err(metadata_read)?;

    let mut map = ShardMap::new();
    for record in &records {
        let name = string_field(record, "_id")?;
        let host = string_field(record, "host")?;
        map.insert(name.to_string(), normalize_shard_host(host).to_string());
    }

    debug!("[splitter] Read {} shard(s) from {}", map.len(), shards);
    Ok(map)
}
