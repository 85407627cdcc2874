//! # Domain Module
//!
//! Core types for split computation: documents, descriptors, splits,
//! configuration and errors.

pub mod config;
pub mod connection;
pub mod document;
pub mod entities;
pub mod errors;
pub mod invariants;

pub use config::*;
pub use connection::*;
pub use document::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
