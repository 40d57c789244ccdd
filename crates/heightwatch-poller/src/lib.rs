//! heightwatch-poller: everything that talks to the network.
//!
//! Downloads the pool registry, polls each pool's stats resource for its
//! height, and runs the two refresh loops that publish fresh snapshots to
//! [`PoolState`](heightwatch_state::PoolState).
//!
//! # Architecture
//!
//! ```text
//! RefreshMonitor
//!   ├── registry loop (~1h)
//!   │   └── RegistryFetcher::fetch() → publish_registry()
//!   └── height loop (~30s)
//!       ├── HeightPoller::poll(registry) → HeightSnapshot
//!       └── HeightReport::from_heights() → publish_heights()
//! ```
//!
//! # Failure handling
//!
//! A pool that cannot be reached or whose payload has no height is logged
//! and left out of that cycle's snapshot. A failed registry fetch keeps the
//! previous registry in place and is retried on the next tick.

pub mod error;
pub mod monitor;
pub mod poller;
pub mod registry;

#[cfg(test)]
mod testutil;

pub use error::{FetchError, PollError};
pub use monitor::{RefreshIntervals, RefreshMonitor};
pub use poller::HeightPoller;
pub use registry::{RegistryFetcher, parse_registry};

use heightwatch_core::HeightwatchConfig;

/// Build the HTTP client shared by the fetcher and the poller.
///
/// Every request inherits the configured timeout and user agent.
pub fn build_client(config: &HeightwatchConfig) -> Result<reqwest::Client, FetchError> {
    let timeout = config
        .request_timeout()
        .map_err(|e| FetchError::Client(e.to_string()))?;
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(config.user_agent())
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}
