//! Error types for heightwatch core logic.

use thiserror::Error;

/// Errors from reducing a set of heights to one value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("cannot aggregate an empty set of heights")]
    Empty,
}

/// Errors that can occur while loading `heightwatch.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration for {field}: {value:?}")]
    InvalidDuration { field: &'static str, value: String },
}
