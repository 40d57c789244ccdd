//! Error types for registry fetches and height polls.

use thiserror::Error;

/// Errors that abort a whole registry fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("registry is not valid json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("registry document is not a json object")]
    NotAnObject,
}

/// Errors for a single pool's height poll. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("no height found in response from {url}")]
    MissingHeight { url: String },
}
