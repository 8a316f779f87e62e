//! Parser Phase Metrics
//!
//! Tokenizer throughput: rows produced, time spent, unterminated quotes seen.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Metrics collection for the Parser phase
pub struct ParserMetrics;

impl ParserMetrics {
    /// Record a completed tokenizer pass
    pub fn record_parse_success(rows_produced: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "parser", "documents")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "parser", "rows_produced"))
            .increment(rows_produced as u64);
        ::metrics::histogram!(phase_metric!(histogram, "parser", "duration_seconds"))
            .record(duration_secs);
    }

    /// Input ended inside a quoted field
    pub fn record_unterminated_quote() {
        ::metrics::counter!(phase_metric!(counter, "parser", "unterminated_quotes")).increment(1);
    }

    pub fn record_parse_error(format: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "parser", "errors"), "format" => format)
            .increment(1);
    }
}

impl PhaseMetrics for ParserMetrics {
    fn phase_name() -> &'static str {
        "parser"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "parser", "documents"),
                metric_type: MetricType::Counter,
                help: "Documents tokenized",
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "rows_produced"),
                metric_type: MetricType::Counter,
                help: "CSV rows produced, header included",
            },
            MetricDoc {
                name: phase_metric!(histogram, "parser", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent tokenizing one document",
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "unterminated_quotes"),
                metric_type: MetricType::Counter,
                help: "Documents that ended inside a quoted field",
            },
            MetricDoc {
                name: phase_metric!(counter, "parser", "errors"),
                metric_type: MetricType::Counter,
                help: "Documents that failed to parse",
            },
        ]
    }
}
