//! Domain types for pool registries and height snapshots.
//!
//! Snapshots are immutable once built. A refresh produces a brand-new
//! value that replaces the previous one wholesale; nothing is updated in
//! place.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::median;

/// Human-readable pool identifier, unique within a registry.
pub type PoolName = String;

// ── Registry ───────────────────────────────────────────────────────

/// Where to reach one pool's API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    pub name: PoolName,
    /// Base of the pool API; the stats resource lives directly under it.
    pub status_base_url: String,
}

impl EndpointDescriptor {
    pub fn new(name: impl Into<String>, status_base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status_base_url: status_base_url.into(),
        }
    }

    /// URL of the pool's stats resource.
    pub fn stats_url(&self) -> String {
        if self.status_base_url.ends_with('/') {
            format!("{}stats", self.status_base_url)
        } else {
            format!("{}/stats", self.status_base_url)
        }
    }
}

/// Every known pool, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pools: BTreeMap<PoolName, EndpointDescriptor>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.pools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// Descriptors in pool-name order.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.pools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

impl FromIterator<EndpointDescriptor> for RegistrySnapshot {
    /// Later descriptors with a duplicate name replace earlier ones.
    fn from_iter<I: IntoIterator<Item = EndpointDescriptor>>(iter: I) -> Self {
        Self {
            pools: iter.into_iter().map(|d| (d.name.clone(), d)).collect(),
        }
    }
}

// ── Heights ────────────────────────────────────────────────────────

/// Heights of the pools that answered one poll cycle.
///
/// Pools whose poll failed are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeightSnapshot {
    heights: BTreeMap<PoolName, u64>,
}

impl HeightSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, height: u64) {
        self.heights.insert(name.into(), height);
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.heights.get(name).copied()
    }

    /// `(name, height)` pairs in pool-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.heights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn values(&self) -> Vec<u64> {
        self.heights.values().copied().collect()
    }
}

impl FromIterator<(PoolName, u64)> for HeightSnapshot {
    fn from_iter<I: IntoIterator<Item = (PoolName, u64)>>(iter: I) -> Self {
        Self {
            heights: iter.into_iter().collect(),
        }
    }
}

/// Result of one height-refresh iteration: the snapshot plus the median
/// computed from that same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeightReport {
    pub heights: HeightSnapshot,
    /// Median height; `None` when no pool answered.
    pub aggregate: Option<u64>,
    /// Unix timestamp (seconds) of the poll; 0 before the first poll.
    pub polled_at: u64,
}

impl HeightReport {
    /// Report published before any poll has completed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_heights(heights: HeightSnapshot, polled_at: u64) -> Self {
        let aggregate = median(&heights.values()).ok();
        Self {
            heights,
            aggregate,
            polled_at,
        }
    }
}
