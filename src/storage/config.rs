//! Storage configuration
//!
//! Settings are loaded from environment variables:
//! - `TSS_INITIAL_CAPACITY`: initial capacity of the metric map (default: 1024)
//! - `TSS_SHARD_AMOUNT`: shard count of the metric map, power of two (default: map decides)

use tracing::warn;

/// Tuning knobs for the in-memory engine
#[derive(Debug, Clone)]
pub struct MemoryStorageConfig {
    /// Initial capacity of the metric map (default: 1024)
    pub initial_capacity: usize,
    /// Shard count of the metric map; must be a power of two greater than one
    pub shard_amount: Option<usize>,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        MemoryStorageConfig {
            initial_capacity: 1024,
            shard_amount: None,
        }
    }
}

impl MemoryStorageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        MemoryStorageConfig {
            initial_capacity: std::env::var("TSS_INITIAL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.initial_capacity),
            shard_amount: std::env::var("TSS_SHARD_AMOUNT")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
        .validated()
    }

    /// Drop a shard amount the concurrent map would reject
    fn validated(mut self) -> Self {
        if let Some(shards) = self.shard_amount {
            if shards < 2 || !shards.is_power_of_two() {
                warn!(shards, "ignoring invalid shard amount, must be a power of two > 1");
                self.shard_amount = None;
            }
        }
        self
    }
}
