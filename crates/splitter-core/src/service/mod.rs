//! Service layer.

mod collection_splitter;

pub use collection_splitter::CollectionSplitter;
