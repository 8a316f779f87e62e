//! Ingestion and normalization of participation, controversy and popularity
//! datasets, and the graph models derived from them.

pub mod common;
pub mod config;
pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod handoff;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{ErrorClass, IngestError, Result};
pub use handoff::{Handoff, HandoffStore};
pub use pipeline::processing::export::to_csv;
pub use pipeline::processing::graph::{color_from_id, GraphModel, GraphModelBuilder, PieChart};
pub use pipeline::processing::normalize::normalize;
pub use pipeline::processing::parser::parse_csv;
pub use pipeline::processing::validate::SchemaValidator;
pub use pipeline::{IngestReport, Ingested, Pipeline};
pub use types::{CanonicalDataset, DatasetKind, InputFormat, Stance};
