//! heightwatch-core: domain types and pure logic for heightwatch.
//!
//! Holds everything that does not touch the network: the pool registry
//! and height snapshot types, the median aggregator, the tolerant
//! `"height":<digits>` scanner used on pool stats payloads, and the
//! `heightwatch.toml` configuration.
//!
//! # Data flow
//!
//! ```text
//! RegistrySnapshot ──poll──▶ HeightSnapshot ──median──▶ HeightReport
//!   (name → descriptor)      (name → height)          (heights + aggregate)
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod types;

pub use aggregate::median;
pub use config::{HeightwatchConfig, parse_duration};
pub use error::{AggregateError, ConfigError};
pub use extract::extract_height;
pub use types::*;
