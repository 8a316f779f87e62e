//! Graph Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct GraphMetrics;

impl GraphMetrics {
    pub fn record_built(nodes: usize, edges: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "models")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "graph", "nodes")).increment(nodes as u64);
        ::metrics::counter!(phase_metric!(counter, "graph", "edges")).increment(edges as u64);
    }

    pub fn record_synthesized_positions(count: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "synthesized_positions"))
            .increment(count as u64);
    }

    pub fn record_dangling_edges(count: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "dangling_edges")).increment(count as u64);
    }
}

impl PhaseMetrics for GraphMetrics {
    fn phase_name() -> &'static str {
        "graph"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "graph", "models"),
                metric_type: MetricType::Counter,
                help: "Graph models built",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "nodes"),
                metric_type: MetricType::Counter,
                help: "Visual nodes produced",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "edges"),
                metric_type: MetricType::Counter,
                help: "Visual edges produced",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "synthesized_positions"),
                metric_type: MetricType::Counter,
                help: "Nodes placed at a random point for lack of a supplied position",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "dangling_edges"),
                metric_type: MetricType::Counter,
                help: "Edges whose endpoints do not resolve to a node",
            },
        ]
    }
}
