//! Validate Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ValidateMetrics;

impl ValidateMetrics {
    pub fn record_schema_violation(kind: &'static str, missing_fields: usize) {
        ::metrics::counter!(phase_metric!(counter, "validate", "schema_violations"), "kind" => kind)
            .increment(1);
        ::metrics::counter!(phase_metric!(counter, "validate", "missing_fields"), "kind" => kind)
            .increment(missing_fields as u64);
    }

    pub fn record_accepted(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "validate", "accepted"), "kind" => kind).increment(1);
    }
}

impl PhaseMetrics for ValidateMetrics {
    fn phase_name() -> &'static str {
        "validate"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "validate", "schema_violations"),
                metric_type: MetricType::Counter,
                help: "Datasets rejected for missing required fields",
            },
            MetricDoc {
                name: phase_metric!(counter, "validate", "missing_fields"),
                metric_type: MetricType::Counter,
                help: "Required fields reported missing",
            },
            MetricDoc {
                name: phase_metric!(counter, "validate", "accepted"),
                metric_type: MetricType::Counter,
                help: "Datasets that passed validation",
            },
        ]
    }
}
