//! Cross-module flows driven through the public `SplitterApi`.

#[cfg(test)]
pub mod fixtures;

pub mod coverage;
pub mod flows;
