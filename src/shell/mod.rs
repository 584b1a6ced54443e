//! Shell surface for inspecting the store
//!
//! A thin formatting wrapper over the introspection side of the storage
//! contract: the one operator command is "display all metrics". No query
//! logic lives here.

use serde_json::Error as JsonError;

use crate::storage::TimeSeriesStorage;

/// Output format of the metric listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Plain,
    Json,
}

/// Lists every known metric, one per line, sorted by identity key so the
/// output is stable across runs.
pub struct MetricsCommand<'a> {
    storage: &'a dyn TimeSeriesStorage,
}

impl<'a> MetricsCommand<'a> {
    pub fn new(storage: &'a dyn TimeSeriesStorage) -> Self {
        MetricsCommand { storage }
    }

    pub fn render(&self, format: ListFormat) -> Result<String, JsonError> {
        let mut metrics = self.storage.all_metrics();
        metrics.sort_by_key(|m| m.key());

        match format {
            ListFormat::Plain => {
                let mut out = String::new();
                for metric in &metrics {
                    out.push_str(&metric.to_string());
                    out.push('\n');
                }
                Ok(out)
            }
            ListFormat::Json => serde_json::to_string_pretty(&metrics),
        }
    }
}
