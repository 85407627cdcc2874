//! # Shard Chunk Strategy
//!
//! One split per chunk of a sharded collection, read from `config.chunks`.
//! Splits are optionally steered at the owning shard, or spread round-robin
//! across the routers listed in the input descriptor.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use super::shard_map::{get_shards_map, metadata_read};
use super::split_factory::SplitFactory;
use super::uri_rewrite::rewrite_uri;
use crate::domain::{
    invariant_contiguous_chunks, is_max_key, is_min_key, ChunkRange, Document, InputSplit,
    Namespace, SplitError, SplitterConfig,
};
use crate::ports::{ClusterClient, CHUNKS_COLLECTION, COLLECTIONS_COLLECTION, CONFIG_DATABASE};

/// A chunk record together with the shard that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShardChunk {
    /// Key range of the chunk.
    pub range: ChunkRange,
    /// Owning shard name.
    pub shard: String,
}

fn computation(context: &'static str) -> impl Fn(SplitError) -> SplitError {
    move |err| SplitError::SplitComputation(format!("{}: {}", context, err))
}

/// The `config.collections` record for `namespace`, if the collection is sharded.
pub async fn sharded_collection_record(
    client: &dyn ClusterClient,
    namespace: &Namespace,
) -> Result<Option<Document>, SplitError> {
    let mut filter = Document::new();
    filter.insert("_id".to_string(), Value::from(namespace.to_string()));

    let records = client
        .find(
            &Namespace::new(CONFIG_DATABASE, COLLECTIONS_COLLECTION),
            &filter,
            None,
        )
        .await
        .map_err(metadata_read)?;

    Ok(records
        .into_iter()
        .find(|record| record.get("dropped").and_then(Value::as_bool) != Some(true)))
}

fn parse_chunk(record: &Document) -> Result<ShardChunk, SplitError> {
    let malformed = || {
        SplitError::SplitComputation(format!(
            "malformed chunk record: {}",
            Value::Object(record.clone())
        ))
    };
    let bound = |field: &str| record.get(field).and_then(Value::as_object).cloned();

    Ok(ShardChunk {
        range: ChunkRange {
            min: bound("min").ok_or_else(malformed)?,
            max: bound("max").ok_or_else(malformed)?,
        },
        shard: record
            .get("shard")
            .and_then(Value::as_str)
            .ok_or_else(malformed)?
            .to_string(),
    })
}

fn bound_key(bound: &Document) -> String {
    Value::Object(bound.clone()).to_string()
}

/// Put chunks in key order by following each chunk's max to the next min.
///
/// Fails if two chunks start at the same boundary, if the chain breaks
/// before reaching the maximum key, or if any chunk is left off the chain.
pub fn order_chunks(chunks: Vec<ShardChunk>) -> Result<Vec<ShardChunk>, SplitError> {
    let total = chunks.len();
    let mut by_min: HashMap<String, ShardChunk> = HashMap::with_capacity(total);
    let mut start = None;

    for chunk in chunks {
        let key = bound_key(&chunk.range.min);
        if !chunk.range.min.is_empty() && chunk.range.min.values().all(is_min_key) {
            start = Some(key.clone());
        }
        if by_min.insert(key.clone(), chunk).is_some() {
            return Err(SplitError::SplitComputation(format!(
                "overlapping chunks: more than one chunk starts at {}",
                key
            )));
        }
    }

    let mut ordered = Vec::with_capacity(total);
    let mut next = start;
    while let Some(key) = next.take() {
        let Some(chunk) = by_min.remove(&key) else {
            return Err(SplitError::SplitComputation(format!(
                "gap in chunk boundaries: no chunk starts at {}",
                key
            )));
        };
        let at_end = chunk.range.max.values().all(is_max_key);
        if !at_end {
            next = Some(bound_key(&chunk.range.max));
        }
        ordered.push(chunk);
    }

    if !by_min.is_empty() {
        return Err(SplitError::SplitComputation(format!(
            "{} chunk(s) are not part of the boundary chain",
            by_min.len()
        )));
    }

    let ranges: Vec<ChunkRange> = ordered.iter().map(|c| c.range.clone()).collect();
    invariant_contiguous_chunks(&ranges)?;
    Ok(ordered)
}

/// Read and order the chunks of `namespace`.
///
/// `collection` is the collection's `config.collections` record, when one was
/// found; its `uuid` selects the chunks, otherwise they are matched by `ns`.
pub async fn read_chunks(
    client: &dyn ClusterClient,
    namespace: &Namespace,
    collection: Option<&Document>,
) -> Result<Vec<ShardChunk>, SplitError> {
    let mut filter = Document::new();
    match collection.and_then(|record| record.get("uuid")) {
        Some(uuid) => filter.insert("uuid".to_string(), uuid.clone()),
        None => filter.insert("ns".to_string(), Value::from(namespace.to_string())),
    };
    let mut sort = Document::new();
    sort.insert("min".to_string(), Value::from(1));

    let records = client
        .find(
            &Namespace::new(CONFIG_DATABASE, CHUNKS_COLLECTION),
            &filter,
            Some(&sort),
        )
        .await
        .map_err(computation("cannot read chunk metadata"))?;

    if records.is_empty() {
        return Err(SplitError::SplitComputation(format!(
            "no chunks found for {}",
            namespace
        )));
    }

    let chunks = records
        .iter()
        .map(parse_chunk)
        .collect::<Result<Vec<_>, _>>()?;
    debug!("[splitter] Read {} chunk(s) for {}", chunks.len(), namespace);
    order_chunks(chunks)
}

/// One split per chunk of `namespace`.
pub async fn calculate_shard_chunk_splits(
    config: &SplitterConfig,
    client: &dyn ClusterClient,
    namespace: &Namespace,
    collection: Option<&Document>,
) -> Result<Vec<InputSplit>, SplitError> {
    let chunks = read_chunks(client, namespace, collection).await?;

    let shards = if config.read_from_shards() {
        Some(get_shards_map(client).await?)
    } else {
        None
    };
    let routers = config.input_uri().hosts();

    let factory = SplitFactory::new(config);
    let mut splits = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        let split =
            factory.create_split_from_bounds(Some(&chunk.range.min), Some(&chunk.range.max))?;

        let target = match &shards {
            Some(map) => Some(map.get(&chunk.shard).map(String::as_str).ok_or_else(|| {
                SplitError::SplitComputation(format!(
                    "chunk owned by unknown shard '{}'",
                    chunk.shard
                ))
            })?),
            None if routers.len() > 1 => Some(routers[i % routers.len()]),
            None => None,
        };

        match target {
            Some(hosts) => splits.push(split.with_input_uri(rewrite_uri(&split.input_uri, hosts)?)),
            None => splits.push(split),
        }
    }

    info!(
        namespace = %namespace,
        splits = splits.len(),
        read_from_shards = config.read_from_shards(),
        "[splitter] Calculated shard chunk splits"
    );
    Ok(splits)
}
