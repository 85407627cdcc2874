//! Splitter configuration.
//!
//! Built once before a calculation pass and never mutated by the splitter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::str::FromStr;

use super::connection::{ConnectionUri, DEFAULT_AUTH_DATABASE};
use super::document::{parse_document, Document};
use super::errors::SplitError;

/// Default `splitVector` chunk size in megabytes.
pub const DEFAULT_SPLIT_SIZE_MB: u32 = 8;

/// How `calculate_splits` derives boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitStrategy {
    /// Shard chunks for sharded collections, split vector otherwise.
    #[default]
    Auto,
    /// One split covering the whole collection.
    Single,
    /// One split per chunk listed in `config.chunks`.
    ShardChunks,
    /// Split points computed by the `splitVector` command.
    SplitVector,
}

impl FromStr for SplitStrategy {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "single" => Ok(Self::Single),
            "shard-chunks" | "shard_chunks" => Ok(Self::ShardChunks),
            "split-vector" | "split_vector" => Ok(Self::SplitVector),
            other => Err(SplitError::Config(format!("unknown split strategy '{}'", other))),
        }
    }
}

/// Configuration for a [`crate::CollectionSplitter`].
#[derive(Clone, Debug, PartialEq)]
pub struct SplitterConfig {
    input_uri: ConnectionUri,
    auth_uri: Option<ConnectionUri>,
    query: Option<Document>,
    use_range_query: bool,
    no_timeout: bool,
    fields: Option<Document>,
    sort: Option<Document>,
    strategy: SplitStrategy,
    read_from_shards: bool,
    split_key: Document,
    split_size_mb: u32,
}

impl SplitterConfig {
    /// Configuration reading from `input_uri` with every option at its default.
    pub fn new(input_uri: ConnectionUri) -> Self {
        let mut split_key = Document::new();
        split_key.insert("_id".to_string(), Value::from(1));

        Self {
            input_uri,
            auth_uri: None,
            query: None,
            use_range_query: false,
            no_timeout: false,
            fields: None,
            sort: None,
            strategy: SplitStrategy::default(),
            read_from_shards: false,
            split_key,
            split_size_mb: DEFAULT_SPLIT_SIZE_MB,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SPLITTER_INPUT_URI`: input descriptor (required)
    /// - `SPLITTER_AUTH_URI`: auth descriptor
    /// - `SPLITTER_QUERY`, `SPLITTER_FIELDS`, `SPLITTER_SORT`: JSON documents
    /// - `SPLITTER_USE_RANGE_QUERY`, `SPLITTER_NO_TIMEOUT`, `SPLITTER_READ_FROM_SHARDS`: booleans
    /// - `SPLITTER_STRATEGY`: `auto`, `single`, `shard-chunks` or `split-vector`
    /// - `SPLITTER_SPLIT_KEY`: JSON key pattern (default `{"_id": 1}`)
    /// - `SPLITTER_SPLIT_SIZE_MB`: chunk size for `splitVector` (default 8)
    pub fn from_env() -> Result<Self, SplitError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, SplitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = lookup("SPLITTER_INPUT_URI")
            .ok_or_else(|| SplitError::Config("SPLITTER_INPUT_URI is not set".to_string()))?;
        let mut config = Self::new(ConnectionUri::parse(&input)?);

        if let Some(auth) = lookup("SPLITTER_AUTH_URI") {
            config.auth_uri = Some(ConnectionUri::parse(&auth)?);
        }
        config.query = parse_doc_var(&lookup, "SPLITTER_QUERY")?;
        config.fields = parse_doc_var(&lookup, "SPLITTER_FIELDS")?;
        config.sort = parse_doc_var(&lookup, "SPLITTER_SORT")?;
        if let Some(key) = parse_doc_var(&lookup, "SPLITTER_SPLIT_KEY")? {
            config.split_key = key;
        }

        config.use_range_query = parse_bool_var(&lookup, "SPLITTER_USE_RANGE_QUERY")?;
        config.no_timeout = parse_bool_var(&lookup, "SPLITTER_NO_TIMEOUT")?;
        config.read_from_shards = parse_bool_var(&lookup, "SPLITTER_READ_FROM_SHARDS")?;

        if let Some(strategy) = lookup("SPLITTER_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        if let Some(size) = lookup("SPLITTER_SPLIT_SIZE_MB") {
            config.split_size_mb = size.trim().parse().map_err(|_| {
                SplitError::Config(format!("SPLITTER_SPLIT_SIZE_MB is not a number: '{}'", size))
            })?;
        }

        Ok(config)
    }

    /// Config for testing: single local router, `test.items`.
    pub fn for_testing() -> Self {
        match ConnectionUri::parse("mongodb://localhost:27017/test.items") {
            Ok(uri) => Self::new(uri),
            Err(_) => unreachable!("static descriptor is well formed"),
        }
    }

    /// Replace the auth descriptor.
    pub fn with_auth_uri(mut self, auth_uri: Option<ConnectionUri>) -> Self {
        self.auth_uri = auth_uri;
        self
    }

    /// Replace the query filter.
    pub fn with_query(mut self, query: Option<Document>) -> Self {
        self.query = query;
        self
    }

    /// Toggle range-query mode.
    pub fn with_use_range_query(mut self, use_range_query: bool) -> Self {
        self.use_range_query = use_range_query;
        self
    }

    /// Toggle the server-side cursor timeout.
    pub fn with_no_timeout(mut self, no_timeout: bool) -> Self {
        self.no_timeout = no_timeout;
        self
    }

    /// Replace the projection.
    pub fn with_fields(mut self, fields: Option<Document>) -> Self {
        self.fields = fields;
        self
    }

    /// Replace the sort order.
    pub fn with_sort(mut self, sort: Option<Document>) -> Self {
        self.sort = sort;
        self
    }

    /// Select the split strategy.
    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Steer chunk splits directly at their owning shard.
    pub fn with_read_from_shards(mut self, read_from_shards: bool) -> Self {
        self.read_from_shards = read_from_shards;
        self
    }

    /// Replace the key pattern used by `splitVector`.
    pub fn with_split_key(mut self, split_key: Document) -> Self {
        self.split_key = split_key;
        self
    }

    /// Replace the `splitVector` chunk size.
    pub fn with_split_size_mb(mut self, split_size_mb: u32) -> Self {
        self.split_size_mb = split_size_mb;
        self
    }

    /// Input descriptor.
    pub fn input_uri(&self) -> &ConnectionUri {
        &self.input_uri
    }

    /// Auth descriptor.
    pub fn auth_uri(&self) -> Option<&ConnectionUri> {
        self.auth_uri.as_ref()
    }

    /// Query filter.
    pub fn query(&self) -> Option<&Document> {
        self.query.as_ref()
    }

    /// Whether range-query mode is on.
    pub fn use_range_query(&self) -> bool {
        self.use_range_query
    }

    /// Whether the cursor timeout is disabled.
    pub fn no_timeout(&self) -> bool {
        self.no_timeout
    }

    /// Projection.
    pub fn fields(&self) -> Option<&Document> {
        self.fields.as_ref()
    }

    /// Sort order.
    pub fn sort(&self) -> Option<&Document> {
        self.sort.as_ref()
    }

    /// Configured strategy.
    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// Whether chunk splits target shards directly.
    pub fn read_from_shards(&self) -> bool {
        self.read_from_shards
    }

    /// Key pattern for `splitVector`.
    pub fn split_key(&self) -> &Document {
        &self.split_key
    }

    /// Chunk size for `splitVector`.
    pub fn split_size_mb(&self) -> u32 {
        self.split_size_mb
    }

    /// Database to authenticate against, derived from the auth descriptor.
    pub fn auth_database(&self) -> Option<&str> {
        self.auth_uri
            .as_ref()
            .map(|uri| uri.database().unwrap_or(DEFAULT_AUTH_DATABASE))
    }
}

fn parse_doc_var<F>(lookup: &F, name: &str) -> Result<Option<Document>, SplitError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|text| {
            parse_document(&text)
                .map_err(|e| SplitError::Config(format!("{} is not a JSON object: {}", name, e)))
        })
        .transpose()
}

fn parse_bool_var<F>(lookup: &F, name: &str) -> Result<bool, SplitError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(false),
        Some(v) => match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(SplitError::Config(format!("{} is not a boolean: '{}'", name, v))),
        },
    }
}
