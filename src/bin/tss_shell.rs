//! Metric listing shell
//!
//! Ingests samples into an in-memory time-series store and displays all
//! resulting metrics, sorted by identity key.
//!
//! Usage:
//!   tss-shell [--json] [FILE]
//!
//! Samples are read from FILE (or stdin) one per line:
//!   <intrinsic-tags> <timestamp-ms> <value> [meta-tags]
//!
//! Tags use the "key:value,key2:value2" format, e.g.:
//!   host:web01,unit:ms 1700000000000 12.5 desc:latency

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use tracing::{info, warn};

use tss_memory::shell::{ListFormat, MetricsCommand};
use tss_memory::{
    MemoryStorage, MemoryStorageConfig, Metric, Sample, TagSet, TimeSeriesStorage,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut format = ListFormat::Plain;
    let mut path: Option<String> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => format = ListFormat::Json,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let storage = MemoryStorage::with_config(&MemoryStorageConfig::from_env());

    let reader: Box<dyn Read> = match &path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let samples = read_samples(BufReader::new(reader));
    storage.store(&samples)?;
    info!(
        samples_written = storage.samples_written(),
        metrics = storage.metric_count(),
        "ingest complete"
    );

    let listing = MetricsCommand::new(&storage).render(format)?;
    print!("{}", listing);
    Ok(())
}

/// Parse one sample per line; malformed lines are skipped with a warning
fn read_samples(reader: impl BufRead) -> Vec<Sample> {
    let mut samples = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(line = number + 1, error = %e, "unreadable line, stopping ingest");
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_sample(trimmed) {
            Some(sample) => samples.push(sample),
            None => warn!(line = number + 1, "skipping malformed sample line"),
        }
    }
    samples
}

/// `<intrinsic-tags> <timestamp-ms> <value> [meta-tags]`
fn parse_sample(line: &str) -> Option<Sample> {
    let mut fields = line.split_whitespace();
    let intrinsic = TagSet::parse(fields.next()?);
    let timestamp_ms: u64 = fields.next()?.parse().ok()?;
    let value: f64 = fields.next()?.parse().ok()?;

    if intrinsic.is_empty() {
        return None;
    }

    let mut metric = Metric::new(intrinsic);
    if let Some(meta) = fields.next() {
        metric = metric.with_meta_tags(TagSet::parse(meta));
    }
    Some(Sample::new(metric, timestamp_ms, value))
}

fn print_usage() {
    println!("Usage: tss-shell [--json] [FILE]");
    println!();
    println!("Reads samples (one per line) from FILE or stdin, then lists all metrics.");
    println!("Line format: <intrinsic-tags> <timestamp-ms> <value> [meta-tags]");
    println!("Example:     host:web01,unit:ms 1700000000000 12.5 desc:latency");
}
