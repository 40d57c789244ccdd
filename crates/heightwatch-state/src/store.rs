//! Snapshot publication.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use heightwatch_core::{HeightReport, RegistrySnapshot};

use crate::claims::ClaimBook;

struct Inner {
    registry: watch::Sender<Arc<RegistrySnapshot>>,
    heights: watch::Sender<Arc<HeightReport>>,
    claims: ClaimBook,
}

/// Shared holder for the latest registry and height report.
///
/// Only the refresh loops write; readers clone the current `Arc` and
/// never hold a guard across an await point.
#[derive(Clone)]
pub struct PoolState {
    inner: Arc<Inner>,
}

impl PoolState {
    /// Start with an empty registry and no heights.
    pub fn new() -> Self {
        Self::with_registry(RegistrySnapshot::new())
    }

    pub fn with_registry(registry: RegistrySnapshot) -> Self {
        let (registry, _) = watch::channel(Arc::new(registry));
        let (heights, _) = watch::channel(Arc::new(HeightReport::empty()));
        Self {
            inner: Arc::new(Inner {
                registry,
                heights,
                claims: ClaimBook::new(),
            }),
        }
    }

    /// Latest published registry.
    pub fn registry(&self) -> Arc<RegistrySnapshot> {
        self.inner.registry.borrow().clone()
    }

    /// Latest published height report.
    pub fn heights(&self) -> Arc<HeightReport> {
        self.inner.heights.borrow().clone()
    }

    /// Replace the registry wholesale.
    pub fn publish_registry(&self, registry: RegistrySnapshot) {
        let pools = registry.len();
        self.inner.registry.send_replace(Arc::new(registry));
        debug!(pools, "registry snapshot published");
    }

    /// Replace the height report wholesale.
    pub fn publish_heights(&self, report: HeightReport) -> Arc<HeightReport> {
        let report = Arc::new(report);
        self.inner.heights.send_replace(report.clone());
        debug!(
            pools = report.heights.len(),
            aggregate = ?report.aggregate,
            "height report published"
        );
        report
    }

    /// Receiver that is notified on every height publication.
    pub fn subscribe_heights(&self) -> watch::Receiver<Arc<HeightReport>> {
        self.inner.heights.subscribe()
    }

    pub fn claims(&self) -> &ClaimBook {
        &self.inner.claims
    }
}

impl Default for PoolState {
    fn default() -> Self {
        Self::new()
    }
}
