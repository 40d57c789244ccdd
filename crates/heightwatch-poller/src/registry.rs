//! Pool registry download and parsing.
//!
//! The registry is a JSON object keyed by pool name:
//!
//! ```json
//! { "SomePool": { "url": "https://api.somepool.example/", "...": "..." } }
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use heightwatch_core::{EndpointDescriptor, RegistrySnapshot};

use crate::error::FetchError;

/// Downloads the registry document from a fixed URL.
#[derive(Debug, Clone)]
pub struct RegistryFetcher {
    client: reqwest::Client,
    url: String,
}

impl RegistryFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the registry. Makes exactly one request.
    pub async fn fetch(&self) -> Result<RegistrySnapshot, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|source| FetchError::Request {
            url: self.url.clone(),
            source,
        })?;

        let registry = parse_registry(&body)?;
        debug!(url = %self.url, pools = registry.len(), "registry downloaded");
        Ok(registry)
    }
}

/// Parse a registry document.
///
/// Entries without a string `url` field are skipped; the rest of the
/// document still counts.
pub fn parse_registry(body: &str) -> Result<RegistrySnapshot, FetchError> {
    let doc: Value = serde_json::from_str(body)?;
    let Value::Object(entries) = doc else {
        return Err(FetchError::NotAnObject);
    };

    let registry: RegistrySnapshot = entries
        .into_iter()
        .filter_map(|(name, entry)| match entry.get("url").and_then(Value::as_str) {
            Some(url) => Some(EndpointDescriptor::new(name, url)),
            None => {
                warn!(pool = %name, "registry entry has no url, skipping");
                None
            }
        })
        .collect();

    Ok(registry)
}
