//! # Collection Splitter Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs   # Seeded clusters and a test-side filter matcher
//!     ├── flows.rs      # init → calculate_splits against an in-memory cluster
//!     └── coverage.rs   # Every key lands in exactly one split
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p splitter-tests
//! cargo test -p splitter-tests integration::coverage::
//! ```

pub mod integration;
