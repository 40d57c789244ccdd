//! Per-pool height polling.
//!
//! Every pool in a registry is queried concurrently. A pool that fails for
//! any reason is logged and left out of the resulting snapshot.

use tokio::task::JoinSet;
use tracing::{debug, warn};

use heightwatch_core::{EndpointDescriptor, HeightSnapshot, RegistrySnapshot, extract_height};

use crate::error::PollError;

/// Queries pool stats endpoints for their current height.
#[derive(Debug, Clone)]
pub struct HeightPoller {
    client: reqwest::Client,
}

impl HeightPoller {
    /// The client's timeout bounds every individual poll.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Poll every pool in `registry` and collect the heights that came back.
    ///
    /// Never fails as a whole; returns once every pool has been attempted.
    pub async fn poll(&self, registry: &RegistrySnapshot) -> HeightSnapshot {
        let mut tasks = JoinSet::new();
        for pool in registry.iter() {
            let poller = self.clone();
            let pool = pool.clone();
            tasks.spawn(async move {
                let result = poller.poll_pool(&pool).await;
                (pool.name, result)
            });
        }

        let mut heights = HeightSnapshot::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(height))) => {
                    debug!(pool = %name, height, "pool height polled");
                    heights.insert(name, height);
                }
                Ok((name, Err(e))) => {
                    warn!(pool = %name, error = %e, "failed to poll pool height");
                }
                Err(e) => {
                    warn!(error = %e, "height poll task aborted");
                }
            }
        }

        debug!(
            polled = heights.len(),
            registered = registry.len(),
            "height poll cycle complete"
        );
        heights
    }

    /// Fetch one pool's stats resource and scan it for a height.
    pub async fn poll_pool(&self, pool: &EndpointDescriptor) -> Result<u64, PollError> {
        let url = pool.stats_url();

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| PollError::Request {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|source| PollError::Request {
            url: url.clone(),
            source,
        })?;

        extract_height(&body).ok_or(PollError::MissingHeight { url })
    }
}
