//! Volatile Time-Series Storage
//!
//! This module provides the storage/query engine:
//!
//! - **Metric identity** keyed by immutable intrinsic tags
//! - **Concurrent series map** with atomic per-key creation
//! - **Tag matcher evaluation** for metric discovery (AND-of-ORs)
//! - **Raw time-range retrieval** with exclusive bounds

mod api;
mod config;
mod error;
mod matcher;
mod memory;
mod types;

pub use api::TimeSeriesStorage;
pub use config::MemoryStorageConfig;
pub use error::StorageError;
pub use matcher::{matches_metric, matches_tag, MatcherType, TagMatcher};
pub use memory::MemoryStorage;
pub use types::{Aggregation, Metric, Sample, Tag, TagSet, TimeseriesRequest};
