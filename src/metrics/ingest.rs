//! Ingest Phase Metrics
//!
//! Input sizes, oversize rejections and cache behavior at the pipeline entry.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct IngestMetrics;

impl IngestMetrics {
    pub fn record_input(bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "files")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "ingest", "input_bytes")).record(bytes as f64);
    }

    pub fn record_oversize() {
        ::metrics::counter!(phase_metric!(counter, "ingest", "oversize_rejections")).increment(1);
    }

    pub fn record_failure(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "failures"), "kind" => kind).increment(1);
    }

    pub fn record_cache_hit() {
        ::metrics::counter!(phase_metric!(counter, "ingest", "cache_hits")).increment(1);
    }

    pub fn record_duration(duration_secs: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "ingest", "duration_seconds")).record(duration_secs);
    }
}

impl PhaseMetrics for IngestMetrics {
    fn phase_name() -> &'static str {
        "ingest"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "ingest", "files"),
                metric_type: MetricType::Counter,
                help: "Files handed to the pipeline",
            },
            MetricDoc {
                name: phase_metric!(histogram, "ingest", "input_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of each input in bytes",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "oversize_rejections"),
                metric_type: MetricType::Counter,
                help: "Inputs rejected for exceeding the size cap",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "failures"),
                metric_type: MetricType::Counter,
                help: "Ingest attempts that produced no dataset",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "cache_hits"),
                metric_type: MetricType::Counter,
                help: "Ingests answered from the content-keyed cache",
            },
            MetricDoc {
                name: phase_metric!(histogram, "ingest", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of a full ingest",
            },
        ]
    }
}
