//! heightwatch-state: process-wide state shared by the refresh loops and
//! the command handler.
//!
//! # Architecture
//!
//! ```text
//! RefreshMonitor ──publish_registry()──▶ ┌───────────┐ ◀──registry()── Command handler
//!                ──publish_heights()───▶ │ PoolState │ ◀──heights()───
//!                                        └───────────┘ ◀──claims()────
//! ```
//!
//! Snapshots are published as whole `Arc` replacements through
//! `tokio::sync::watch`, so a reader always sees either the previous or the
//! next complete snapshot. `PoolState` is `Clone` (backed by `Arc`) and can
//! be handed to any number of tasks.

pub mod claims;
pub mod store;

pub use claims::{ClaimBook, ClaimOutcome, ClaimOwner};
pub use store::PoolState;
