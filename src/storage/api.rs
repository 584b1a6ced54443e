//! The storage contract exposed to the host application

use super::error::StorageError;
use super::matcher::TagMatcher;
use super::types::{Metric, Sample, TimeseriesRequest};

/// Library-level contract of a time-series storage backend.
///
/// Every operation is synchronous: once a call returns, its effect is visible
/// to subsequent calls from any thread. Implementations must tolerate
/// concurrent callers on all operations.
pub trait TimeSeriesStorage: Send + Sync {
    /// Append a batch of samples, creating a series for never-seen metrics.
    ///
    /// Concurrent callers storing into disjoint or identical metrics must not
    /// lose samples; two callers racing on a brand-new metric must end up
    /// sharing exactly one series.
    fn store(&self, samples: &[Sample]) -> Result<(), StorageError>;

    /// Discover metrics whose searchable tags satisfy every matcher.
    ///
    /// At least one matcher is required; an unfiltered "list everything"
    /// query is intentionally rejected at this layer. The result is a weakly
    /// consistent snapshot in unspecified order.
    fn find_metrics(&self, matchers: &[TagMatcher]) -> Result<Vec<Metric>, StorageError>;

    /// Fetch raw samples of one metric whose timestamps fall strictly inside
    /// the request window, in series insertion order.
    ///
    /// An unknown metric yields an empty vector, not an error. Any
    /// aggregation mode other than [`Aggregation::None`] is rejected.
    ///
    /// [`Aggregation::None`]: super::Aggregation::None
    fn get_timeseries(&self, request: &TimeseriesRequest) -> Result<Vec<Sample>, StorageError>;

    /// Drop the whole series of a metric; deleting an unknown metric is a
    /// silent no-op.
    fn delete(&self, metric: &Metric) -> Result<(), StorageError>;

    /// Every currently known metric, in no particular order.
    ///
    /// Introspection hook for the shell listing; not part of the query
    /// surface proper.
    fn all_metrics(&self) -> Vec<Metric>;
}
