//! Collection Splitter Service
//!
//! Owns the configuration and the live connection, and implements the
//! `SplitterApi` port by dispatching to the configured strategy.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::algorithms::{
    calculate_shard_chunk_splits, calculate_split_vector_splits, get_shards_map,
    sharded_collection_record, SplitFactory,
};
use crate::domain::{
    Document, InputSplit, Namespace, ShardMap, SplitError, SplitStrategy, SplitterConfig,
    DEFAULT_AUTH_DATABASE,
};
use crate::ports::{ClusterClient, Connector, SplitterApi};

/// Splits one collection into independent units of scan work.
///
/// Only obtainable through [`CollectionSplitter::init`], so a splitter always
/// holds a live connection.
pub struct CollectionSplitter {
    config: SplitterConfig,
    namespace: Namespace,
    client: Arc<dyn ClusterClient>,
}

impl CollectionSplitter {
    /// Resolve the input descriptor into a connection and authenticate if the
    /// auth descriptor carries credentials.
    ///
    /// # Errors
    ///
    /// - `Connection` if the descriptor names no collection or the cluster
    ///   cannot be reached.
    /// - `Authentication` if the credentials are rejected.
    pub async fn init<C>(config: SplitterConfig, connector: &C) -> Result<Self, SplitError>
    where
        C: Connector + ?Sized,
    {
        let namespace = config.input_uri().namespace().ok_or_else(|| {
            SplitError::Connection(format!(
                "'{}' does not name a database and collection",
                config.input_uri()
            ))
        })?;

        debug!(
            "[splitter] Connecting to {} for {}",
            config.input_uri().host_list(),
            namespace
        );
        let client = connector
            .connect(config.input_uri())
            .await
            .map_err(|e| match e {
                SplitError::Connection(_) => e,
                other => SplitError::Connection(format!(
                    "cannot reach {}: {}",
                    config.input_uri().host_list(),
                    other
                )),
            })?;

        authenticate_if_needed(&config, client.as_ref()).await?;

        Ok(Self {
            config,
            namespace,
            client,
        })
    }

    /// The configuration this splitter was built with.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// The collection being split.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn collection_record(&self) -> Result<Option<Document>, SplitError> {
        sharded_collection_record(self.client.as_ref(), &self.namespace)
            .await
            .map_err(|e| {
                SplitError::SplitComputation(format!(
                    "cannot read collection metadata for {}: {}",
                    self.namespace, e
                ))
            })
    }

    /// The concrete strategy to run, with the `config.collections` record when
    /// it was read along the way.
    async fn resolve_strategy(&self) -> Result<(SplitStrategy, Option<Document>), SplitError> {
        match self.config.strategy() {
            SplitStrategy::Auto => {
                let record = self.collection_record().await?;
                let strategy = if record.is_some() {
                    SplitStrategy::ShardChunks
                } else {
                    SplitStrategy::SplitVector
                };
                Ok((strategy, record))
            }
            SplitStrategy::ShardChunks => {
                Ok((SplitStrategy::ShardChunks, self.collection_record().await?))
            }
            chosen => Ok((chosen, None)),
        }
    }
}

async fn authenticate_if_needed(
    config: &SplitterConfig,
    client: &dyn ClusterClient,
) -> Result<(), SplitError> {
    let Some(auth_uri) = config.auth_uri() else {
        return Ok(());
    };
    let (Some(username), Some(password)) = (auth_uri.username(), auth_uri.password()) else {
        return Ok(());
    };

    let database = config.auth_database().unwrap_or(DEFAULT_AUTH_DATABASE);
    if client.is_authenticated(database).await {
        debug!("[splitter] Already authenticated against {}", database);
        return Ok(());
    }

    client
        .authenticate(database, username, password)
        .await
        .map_err(|e| match e {
            SplitError::Authentication { .. } => e,
            other => SplitError::Authentication {
                database: database.to_string(),
                reason: other.to_string(),
            },
        })?;

    info!(database = %database, user = %username, "[splitter] Authenticated");
    Ok(())
}

#[async_trait]
impl SplitterApi for CollectionSplitter {
    async fn calculate_splits(&self) -> Result<Vec<InputSplit>, SplitError> {
        let (strategy, collection) = self.resolve_strategy().await?;
        info!(
            namespace = %self.namespace,
            strategy = ?strategy,
            range_query = self.config.use_range_query(),
            "[splitter] Calculating splits"
        );

        let client = self.client.as_ref();
        match strategy {
            SplitStrategy::Single => Ok(vec![SplitFactory::new(&self.config)
                .create_split_from_bounds(None, None)?]),
            SplitStrategy::ShardChunks => {
                calculate_shard_chunk_splits(
                    &self.config,
                    client,
                    &self.namespace,
                    collection.as_ref(),
                )
                .await
            }
            SplitStrategy::SplitVector | SplitStrategy::Auto => {
                calculate_split_vector_splits(&self.config, client, &self.namespace).await
            }
        }
    }

    async fn get_shards_map(&self) -> Result<ShardMap, SplitError> {
        get_shards_map(self.client.as_ref()).await
    }

    fn create_split_from_bounds(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
    ) -> Result<InputSplit, SplitError> {
        SplitFactory::new(&self.config).create_split_from_bounds(lower, upper)
    }

    fn create_range_query_split(
        &self,
        lower: Option<&Document>,
        upper: Option<&Document>,
        query: &Document,
    ) -> Result<InputSplit, SplitError> {
        SplitFactory::new(&self.config).create_range_query_split(lower, upper, query)
    }
}
