//! # Domain Errors
//!
//! Error taxonomy for split computation. Every variant is terminal for the
//! calculation pass that raised it; nothing here is retried internally.

use thiserror::Error;

/// Splitter error types.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Source unreachable or the input descriptor cannot be resolved.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Credentials rejected by the auth target database.
    #[error("Authentication failed against '{database}': {reason}")]
    Authentication {
        /// Database authenticated against
        database: String,
        /// Reason reported by the client
        reason: String,
    },

    /// Partition-metadata query failed or timed out.
    #[error("Metadata read failed: {0}")]
    MetadataRead(String),

    /// Compound (or mismatched) boundary supplied to range-query mode.
    #[error("Range query is enabled but one or more split boundaries contains a compound key: min: {min}, max: {max}")]
    InvalidBoundary {
        /// Lower boundary as JSON text
        min: String,
        /// Upper boundary as JSON text
        max: String,
    },

    /// Filter already constrains the split key.
    #[error("Range query is enabled but split key '{key}' conflicts with query filter: {query}")]
    QueryConflict {
        /// The split key
        key: String,
        /// The conflicting filter as JSON text
        query: String,
    },

    /// Connection descriptor does not match the expected syntax.
    #[error("Malformed connection descriptor: {0}")]
    MalformedDescriptor(String),

    /// Failure raised while constructing a single split.
    #[error("Couldn't use range query to create split: {source}")]
    SplitFailed {
        /// Underlying cause
        #[source]
        source: Box<SplitError>,
    },

    /// Strategy could not produce a valid split sequence.
    #[error("Split computation failed: {0}")]
    SplitComputation(String),

    /// Configuration value could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SplitError {
    /// Wrap an error raised during split construction.
    pub fn split_failed(source: SplitError) -> Self {
        Self::SplitFailed {
            source: Box::new(source),
        }
    }

    /// Local misuse signals. These are never transient and must not be retried.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidBoundary { .. }
            | Self::QueryConflict { .. }
            | Self::MalformedDescriptor(_)
            | Self::Config(_) => true,
            Self::SplitFailed { source } => source.is_validation(),
            _ => false,
        }
    }
}

/// Result alias used across the crate.
pub type SplitResult<T> = Result<T, SplitError>;
