//! Error taxonomy of the storage contract

use thiserror::Error;

use super::types::Aggregation;

/// Errors surfaced synchronously by the storage operations.
///
/// Every variant is a caller mistake; the engine has no I/O and therefore no
/// transient failures, retries or recovery paths.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A required input was missing or malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine stores raw samples only; no aggregation mode is implemented
    #[error("aggregation {0} is not supported")]
    UnsupportedAggregation(Aggregation),
}
