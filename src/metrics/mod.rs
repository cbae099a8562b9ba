//! Prometheus metrics for index loading and lookups

use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use tracing::debug;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Lookup metrics
    // ============================================================================

    /// Single-symbol lookups served, including those made by merged lookups
    pub static ref LOOKUPS: Counter = Counter::with_opts(
        Opts::new("crossref_lookups_total", "Total number of single-symbol lookups")
    ).expect("Failed to create LOOKUPS counter");

    /// Lookups for symbols that are not indexed
    pub static ref LOOKUP_MISSES: Counter = Counter::with_opts(
        Opts::new("crossref_lookup_misses_total", "Lookups for symbols not in the index")
    ).expect("Failed to create LOOKUP_MISSES counter");

    pub static ref MERGE_REQUESTS: Counter = Counter::with_opts(
        Opts::new("crossref_merge_requests_total", "Total number of merged lookups")
    ).expect("Failed to create MERGE_REQUESTS counter");

    /// Payloads that failed to parse
    pub static ref MALFORMED_PAYLOADS: Counter = Counter::with_opts(
        Opts::new("crossref_malformed_payloads_total", "Payloads that failed to parse")
    ).expect("Failed to create MALFORMED_PAYLOADS counter");

    /// Slice-and-parse time for found symbols
    pub static ref LOOKUP_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "crossref_lookup_latency_seconds",
            "Lookup latency in seconds"
        ).buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1, 1.0])
    ).expect("Failed to create LOOKUP_LATENCY histogram");

    // ============================================================================
    // Load metrics
    // ============================================================================

    pub static ref TREES_LOADED: Gauge = Gauge::with_opts(
        Opts::new("crossref_trees_loaded", "Trees with a loaded index")
    ).expect("Failed to create TREES_LOADED gauge");

    pub static ref TREES_DEGRADED: Gauge = Gauge::with_opts(
        Opts::new("crossref_trees_degraded", "Trees whose index could not be loaded")
    ).expect("Failed to create TREES_DEGRADED gauge");

    pub static ref INDEXED_SYMBOLS: Gauge = Gauge::with_opts(
        Opts::new("crossref_indexed_symbols", "Symbols across all loaded trees")
    ).expect("Failed to create INDEXED_SYMBOLS gauge");

    pub static ref LOAD_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "crossref_load_duration_seconds",
            "Time to load all configured trees"
        ).buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 30.0])
    ).expect("Failed to create LOAD_LATENCY histogram");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; repeated registrations are ignored.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LOOKUPS.clone()),
        Box::new(LOOKUP_MISSES.clone()),
        Box::new(MERGE_REQUESTS.clone()),
        Box::new(MALFORMED_PAYLOADS.clone()),
        Box::new(LOOKUP_LATENCY.clone()),
        Box::new(TREES_LOADED.clone()),
        Box::new(TREES_DEGRADED.clone()),
        Box::new(INDEXED_SYMBOLS.clone()),
        Box::new(LOAD_LATENCY.clone()),
    ];

    for collector in collectors {
        if let Err(e) = REGISTRY.register(collector) {
            debug!("Metric registration skipped: {}", e);
        }
    }
}

/// Gather all metrics in Prometheus text format.
///
/// Returns an empty string if encoding fails.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}

/// Point-in-time metric values for the CLI stats command
pub struct MetricSnapshot {
    pub lookups_total: f64,
    pub lookup_misses_total: f64,
    pub merge_requests_total: f64,
    pub malformed_payloads_total: f64,
    pub lookup_latency_avg: f64,
    pub trees_loaded: f64,
    pub trees_degraded: f64,
    pub indexed_symbols: f64,
}

impl MetricSnapshot {
    pub fn capture() -> Self {
        Self {
            lookups_total: LOOKUPS.get(),
            lookup_misses_total: LOOKUP_MISSES.get(),
            merge_requests_total: MERGE_REQUESTS.get(),
            malformed_payloads_total: MALFORMED_PAYLOADS.get(),
            lookup_latency_avg: histogram_avg(&LOOKUP_LATENCY),
            trees_loaded: TREES_LOADED.get(),
            trees_degraded: TREES_DEGRADED.get(),
            indexed_symbols: INDEXED_SYMBOLS.get(),
        }
    }
}

fn histogram_avg(histogram: &Histogram) -> f64 {
    let count = histogram.get_sample_count();
    if count == 0 {
        return 0.0;
    }
    histogram.get_sample_sum() / count as f64
}
