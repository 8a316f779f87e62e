//! Centralized metrics for the ingest pipeline
//!
//! Each pipeline phase defines its own metrics in a dedicated submodule so
//! names stay unique and ownership stays obvious. Without an installed
//! recorder every call is a no-op, which is what library users get by default.

pub mod graph;
pub mod ingest;
pub mod normalize;
pub mod parser;
pub mod validate;

pub use graph::GraphMetrics;
pub use ingest::IngestMetrics;
pub use normalize::NormalizeMetrics;
pub use parser::ParserMetrics;
pub use validate::ValidateMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install an in-process Prometheus recorder and register every phase's metrics
///
/// Idempotent. No HTTP listener is started; callers render the snapshot
/// themselves (the CLI prints it after a run).
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                register_all_metrics();
                info!("Prometheus recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
                None
            }
        })
        .as_ref()
}

/// Render the current snapshot, if a recorder was installed
pub fn render() -> Option<String> {
    HANDLE.get().and_then(|h| h.as_ref()).map(|h| h.render())
}

fn register_all_metrics() {
    IngestMetrics::register_metrics();
    ParserMetrics::register_metrics();
    ValidateMetrics::register_metrics();
    NormalizeMetrics::register_metrics();
    GraphMetrics::register_metrics();
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Describe every metric of this phase to the installed recorder
    fn register_metrics() {
        for doc in Self::metrics_documentation() {
            match doc.metric_type {
                MetricType::Counter => ::metrics::describe_counter!(doc.name, doc.help),
                MetricType::Histogram => ::metrics::describe_histogram!(doc.name, doc.help),
            }
        }
    }

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Macro to create phase-specific metric names with consistent naming
///
/// Naming convention: vsion_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("vsion_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("vsion_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
