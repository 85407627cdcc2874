//! Shared fixtures: seeded clusters and a filter matcher that evaluates a
//! split against a single-key document the way a scan would.

use serde_json::{json, Value};
use splitter_core::{
    max_key, min_key, ConnectionUri, Document, InMemoryCluster, InputSplit, Namespace,
    SplitBounds, SplitterConfig,
};

pub const SPLIT_KEY: &str = "_id";

pub fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

pub fn uri(text: &str) -> ConnectionUri {
    ConnectionUri::parse(text).unwrap()
}

pub fn orders() -> Namespace {
    Namespace::new("shop", "orders")
}

/// Config pointing at `shop.orders` through the given router list.
pub fn orders_config(routers: &str) -> SplitterConfig {
    SplitterConfig::new(uri(&format!(
        "mongodb://{}/shop.orders?readPreference=secondary",
        routers
    )))
}

/// Chunk records covering the whole key space, cut at `cuts`.
///
/// Chunk `i` is owned by `shards[i % shards.len()]`.
pub fn chunk_chain(namespace: &Namespace, cuts: &[i64], shards: &[&str]) -> Vec<Document> {
    let mut edges = Vec::with_capacity(cuts.len() + 2);
    edges.push(min_key());
    edges.extend(cuts.iter().map(|c| Value::from(*c)));
    edges.push(max_key());

    edges
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            doc(json!({
                "ns": namespace.to_string(),
                "min": {SPLIT_KEY: pair[0].clone()},
                "max": {SPLIT_KEY: pair[1].clone()},
                "shard": shards[i % shards.len()],
            }))
        })
        .collect()
}

/// A cluster where `namespace` is sharded into `chunks`.
pub fn sharded_cluster(namespace: &Namespace, chunks: Vec<Document>) -> InMemoryCluster {
    let cluster = InMemoryCluster::new();
    cluster.insert(
        &Namespace::new("config", "collections"),
        vec![doc(json!({"_id": namespace.to_string(), "dropped": false}))],
    );
    cluster.insert(&Namespace::new("config", "chunks"), chunks);
    cluster.insert(
        &Namespace::new("config", "shards"),
        vec![
            doc(json!({"_id": "s0", "host": "rs0/s0a:27018,s0b:27018"})),
            doc(json!({"_id": "s1", "host": "rs1/s1a:27018"})),
            doc(json!({"_id": "s2", "host": "s2a:27018"})),
        ],
    );
    cluster
}

fn bound_value(bound: Option<&Document>) -> Option<i64> {
    bound.and_then(|d| d.get(SPLIT_KEY)).and_then(Value::as_i64)
}

/// Whether a document `{_id: value}` falls inside `split`.
pub fn split_matches(split: &InputSplit, value: i64) -> bool {
    let (lower, upper) = match &split.bounds {
        SplitBounds::IndexBounds { min, max } => {
            (bound_value(min.as_ref()), bound_value(max.as_ref()))
        }
        SplitBounds::RangeQuery => match split.query.get(SPLIT_KEY) {
            None => (None, None),
            Some(Value::Object(ops)) => (
                ops.get("$gte").and_then(Value::as_i64),
                ops.get("$lt").and_then(Value::as_i64),
            ),
            Some(other) => return other.as_i64() == Some(value),
        },
    };

    lower.map_or(true, |lo| value >= lo) && upper.map_or(true, |hi| value < hi)
}
