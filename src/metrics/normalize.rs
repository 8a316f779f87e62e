//! Normalize Phase Metrics
//!
//! Record counts per kind and how often dirty cells fell back to defaults.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct NormalizeMetrics;

impl NormalizeMetrics {
    pub fn record_normalized(kind: &'static str, records: usize) {
        ::metrics::counter!(phase_metric!(counter, "normalize", "records"), "kind" => kind)
            .increment(records as u64);
    }

    pub fn record_coercion_fallbacks(kind: &'static str, count: usize) {
        if count == 0 {
            return;
        }
        ::metrics::counter!(phase_metric!(counter, "normalize", "coercion_fallbacks"), "kind" => kind)
            .increment(count as u64);
    }

    /// Rows whose id was already seen and were folded into an earlier record
    pub fn record_duplicates(kind: &'static str, count: usize) {
        if count == 0 {
            return;
        }
        ::metrics::counter!(phase_metric!(counter, "normalize", "duplicate_ids"), "kind" => kind)
            .increment(count as u64);
    }
}

impl PhaseMetrics for NormalizeMetrics {
    fn phase_name() -> &'static str {
        "normalize"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "normalize", "records"),
                metric_type: MetricType::Counter,
                help: "Canonical records produced",
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "coercion_fallbacks"),
                metric_type: MetricType::Counter,
                help: "Cells replaced by a default value",
            },
            MetricDoc {
                name: phase_metric!(counter, "normalize", "duplicate_ids"),
                metric_type: MetricType::Counter,
                help: "Rows folded into an already-seen id",
            },
        ]
    }
}
