pub mod shell;
pub mod storage;

pub use storage::{
    Aggregation, MatcherType, MemoryStorage, MemoryStorageConfig, Metric, Sample, StorageError,
    Tag, TagMatcher, TagSet, TimeSeriesStorage, TimeseriesRequest,
};
