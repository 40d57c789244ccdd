//! Refresh monitor: the two background loops that keep `PoolState` fresh.
//!
//! The registry loop re-downloads the pool list on a long interval; the
//! height loop polls every known pool on a short interval. The loops only
//! meet through the published snapshots.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use heightwatch_core::{ConfigError, HeightReport, HeightwatchConfig};
use heightwatch_state::PoolState;

use crate::error::FetchError;
use crate::poller::HeightPoller;
use crate::registry::RegistryFetcher;

/// Sleep between iterations of each loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub registry: Duration,
    pub heights: Duration,
}

impl RefreshIntervals {
    pub fn from_config(config: &HeightwatchConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            registry: config.registry_interval()?,
            heights: config.poll_interval()?,
        })
    }
}

/// Owns every write to the registry and height snapshots.
#[derive(Clone)]
pub struct RefreshMonitor {
    fetcher: RegistryFetcher,
    poller: HeightPoller,
    state: PoolState,
    intervals: RefreshIntervals,
}

impl RefreshMonitor {
    pub fn new(
        fetcher: RegistryFetcher,
        poller: HeightPoller,
        state: PoolState,
        intervals: RefreshIntervals,
    ) -> Self {
        Self {
            fetcher,
            poller,
            state,
            intervals,
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    /// Download the registry and publish it. Returns the pool count.
    ///
    /// On failure the previously published registry stays in place.
    pub async fn refresh_registry(&self) -> Result<usize, FetchError> {
        let registry = self.fetcher.fetch().await?;
        let pools = registry.len();
        self.state.publish_registry(registry);
        info!(pools, url = %self.fetcher.url(), "pool registry refreshed");
        Ok(pools)
    }

    /// Poll the current registry and publish the heights with their median.
    pub async fn refresh_heights(&self) -> Arc<HeightReport> {
        let registry = self.state.registry();
        let heights = self.poller.poll(&registry).await;

        if heights.is_empty() && !registry.is_empty() {
            warn!(pools = registry.len(), "no pool answered this poll cycle");
        }

        let report = self
            .state
            .publish_heights(HeightReport::from_heights(heights, epoch_secs()));
        debug!(
            pools = report.heights.len(),
            median = ?report.aggregate,
            "pool heights refreshed"
        );
        report
    }

    /// Run the registry loop until shutdown. A failed fetch is logged and
    /// retried on the next tick.
    pub async fn run_registry_loop(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.intervals.registry.as_secs(),
            "registry refresh loop started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.intervals.registry) => {
                    if let Err(e) = self.refresh_registry().await {
                        warn!(error = %e, "registry refresh failed, keeping previous registry");
                    }
                }
                _ = shutdown.changed() => {
                    info!("registry refresh loop shutting down");
                    break;
                }
            }
        }
    }

    /// Run the height loop until shutdown.
    pub async fn run_height_loop(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.intervals.heights.as_secs(),
            "height refresh loop started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.intervals.heights) => {
                    self.refresh_heights().await;
                }
                _ = shutdown.changed() => {
                    info!("height refresh loop shutting down");
                    break;
                }
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
