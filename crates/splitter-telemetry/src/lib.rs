//! # Splitter Telemetry
//!
//! Log output for the collection splitter, built on `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use splitter_telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SPLITTER_SERVICE_NAME` | `collection-splitter` | Name on the startup record |
//! | `SPLITTER_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` is the fallback) |
//! | `SPLITTER_CONSOLE_OUTPUT` | `true` | Write log lines |
//! | `SPLITTER_JSON_LOGS` | `false` | JSON lines (on by default in containers) |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use std::sync::Once;
use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    AlreadyInitialized(String),

    /// The log filter could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for a binary.
///
/// # Example
///
/// ```rust,ignore
/// let config = TelemetryConfig::from_env();
/// init_telemetry(&config)?;
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Initialize logging at most once per process, ignoring a subscriber that
/// some other harness installed first. Meant for test suites.
pub fn init_for_tests() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = init_tracing(&TelemetryConfig::for_tests());
    });
}
