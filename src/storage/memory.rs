//! In-memory storage engine
//!
//! Simulates a time-series storage in process memory. The implementation is
//! deliberately simple and unoptimized; it exists for testing and evaluation,
//! not for production use.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::api::TimeSeriesStorage;
use super::config::MemoryStorageConfig;
use super::error::StorageError;
use super::matcher::{self, TagMatcher};
use super::types::{Aggregation, Metric, Sample, TimeseriesRequest};

/// One metric's append-only sample sequence.
///
/// Appends take the per-series write lock only, never a store-wide lock.
/// Readers clone a snapshot; a reader racing an append may or may not observe
/// the new sample.
#[derive(Debug, Default)]
struct Series {
    samples: RwLock<Vec<Sample>>,
}

impl Series {
    fn append(&self, sample: Sample) {
        self.samples.write().push(sample);
    }

    /// Samples in insertion order, not re-sorted by time
    fn snapshot(&self) -> Vec<Sample> {
        self.samples.read().clone()
    }
}

/// Volatile in-memory time-series store.
///
/// All state is a sharded concurrent map from metric identity to its series,
/// plus one write counter; nothing is persisted and everything is gone when
/// the store is dropped.
pub struct MemoryStorage {
    data: DashMap<Metric, Arc<Series>, RandomState>,
    samples_written: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_config(&MemoryStorageConfig::default())
    }

    pub fn with_config(config: &MemoryStorageConfig) -> Self {
        let hasher = RandomState::new();
        let data = match config.shard_amount {
            Some(shards) => DashMap::with_capacity_and_hasher_and_shard_amount(
                config.initial_capacity,
                hasher,
                shards,
            ),
            None => DashMap::with_capacity_and_hasher(config.initial_capacity, hasher),
        };

        MemoryStorage {
            data,
            samples_written: AtomicU64::new(0),
        }
    }

    /// Total samples accepted since construction.
    ///
    /// Monotonic; read by the host's observability exporter. The store only
    /// ever increments it.
    pub fn samples_written(&self) -> u64 {
        self.samples_written.load(Ordering::Relaxed)
    }

    /// Number of distinct metrics currently held
    pub fn metric_count(&self) -> usize {
        self.data.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeriesStorage for MemoryStorage {
    fn store(&self, samples: &[Sample]) -> Result<(), StorageError> {
        for sample in samples {
            // entry() is the atomic resolve-or-create: two writers racing on
            // a brand-new metric end up appending to the same series. The
            // shard guard is released before the append.
            let series = self
                .data
                .entry(sample.metric.clone())
                .or_default()
                .value()
                .clone();
            series.append(sample.clone());
        }

        self.samples_written
            .fetch_add(samples.len() as u64, Ordering::Relaxed);
        trace!(batch = samples.len(), "stored sample batch");
        Ok(())
    }

    fn find_metrics(&self, matchers: &[TagMatcher]) -> Result<Vec<Metric>, StorageError> {
        if matchers.is_empty() {
            return Err(StorageError::InvalidArgument(
                "at least one tag matcher is required".to_string(),
            ));
        }

        // iter() is a weakly consistent view of the key set: metrics created
        // or removed mid-scan may or may not be observed.
        let mut found = Vec::new();
        for entry in self.data.iter() {
            if matcher::matches_metric(matchers, entry.key())? {
                found.push(entry.key().clone());
            }
        }

        debug!(
            matchers = matchers.len(),
            found = found.len(),
            "metric discovery"
        );
        Ok(found)
    }

    fn get_timeseries(&self, request: &TimeseriesRequest) -> Result<Vec<Sample>, StorageError> {
        if request.aggregation != Aggregation::None {
            return Err(StorageError::UnsupportedAggregation(request.aggregation));
        }

        let series = match self.data.get(&request.metric) {
            Some(entry) => entry.value().clone(),
            None => return Ok(Vec::new()),
        };

        // Both bounds are exclusive.
        let samples = series
            .snapshot()
            .into_iter()
            .filter(|s| s.timestamp_ms > request.start_ms && s.timestamp_ms < request.end_ms)
            .collect();
        Ok(samples)
    }

    fn delete(&self, metric: &Metric) -> Result<(), StorageError> {
        if self.data.remove(metric).is_some() {
            debug!(metric = %metric, "deleted series");
        }
        Ok(())
    }

    fn all_metrics(&self) -> Vec<Metric> {
        self.data.iter().map(|entry| entry.key().clone()).collect()
    }
}
