//! # Split Vector Strategy
//!
//! For collections that are not sharded: ask the server for split points
//! with `splitVector` and turn each consecutive pair into a split.

use serde_json::Value;
use tracing::info;

use super::split_factory::SplitFactory;
use crate::domain::{Document, InputSplit, Namespace, SplitError, SplitterConfig};
use crate::ports::ClusterClient;

/// `splitVector` command for `namespace` using the configured key and size.
pub fn split_vector_command(config: &SplitterConfig, namespace: &Namespace) -> Document {
    let mut command = Document::new();
    command.insert("splitVector".to_string(), Value::from(namespace.to_string()));
    command.insert(
        "keyPattern".to_string(),
        Value::Object(config.split_key().clone()),
    );
    command.insert(
        "maxChunkSize".to_string(),
        Value::from(config.split_size_mb()),
    );
    command
}

/// Extract the split keys from a `splitVector` reply.
pub fn parse_split_keys(reply: &Document) -> Result<Vec<Document>, SplitError> {
    let ok = reply.get("ok").and_then(Value::as_f64).unwrap_or(0.0);
    if ok != 1.0 {
        let errmsg = reply
            .get("errmsg")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(SplitError::SplitComputation(format!(
            "splitVector failed: {}",
            errmsg
        )));
    }

    let keys = reply
        .get("splitKeys")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SplitError::SplitComputation("splitVector reply has no splitKeys".to_string())
        })?;

    let keys = keys
        .iter()
        .map(|key| {
            key.as_object().cloned().ok_or_else(|| {
                SplitError::SplitComputation(format!("split key is not a document: {}", key))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(pair) = keys.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(SplitError::SplitComputation(format!(
            "duplicate split key: {}",
            Value::Object(pair[0].clone())
        )));
    }

    Ok(keys)
}

/// Splits `[∅, k0) [k0, k1) … [kn, ∅)` over the server's split points.
pub async fn calculate_split_vector_splits(
    config: &SplitterConfig,
    client: &dyn ClusterClient,
    namespace: &Namespace,
) -> Result<Vec<InputSplit>, SplitError> {
    let command = split_vector_command(config, namespace);
    let reply = client
        .run_command(&namespace.database, &command)
        .await
        .map_err(|e| SplitError::SplitComputation(format!("splitVector failed: {}", e)))?;
    let keys = parse_split_keys(&reply)?;

    let factory = SplitFactory::new(config);
    let mut splits = Vec::with_capacity(keys.len() + 1);
    let mut lower: Option<&Document> = None;

    for key in &keys {
        splits.push(factory.create_split_from_bounds(lower, Some(key))?);
        lower = Some(key);
    }
    splits.push(factory.create_split_from_bounds(lower, None)?);

    info!(
        namespace = %namespace,
        splits = splits.len(),
        "[splitter] Calculated split vector splits"
    );
    Ok(splits)
}
