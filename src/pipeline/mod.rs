// Data processing pipeline: ingestion, processing, and storage

pub mod ingestion;
pub mod processing;
pub mod storage;
#[allow(clippy::module_inception)]
pub mod pipeline;

// Re-export key types and functions from each stage
pub use pipeline::{IngestReport, Ingested, Pipeline};
pub use processing::parser;
