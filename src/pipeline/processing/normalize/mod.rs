//! RecordNormalizer: header-projected CSV rows back into canonical records.
//!
//! JSON input never passes through here; it is decoded straight into the
//! canonical shape by the parser.

pub mod normalizers;
pub mod registry;

pub use normalizers::{FieldReader, KindNormalizer, MetricsNormalizer};
pub use registry::NormalizationRegistry;

use crate::pipeline::processing::parser::{RawRow, Table};
use crate::types::{CanonicalDataset, DatasetKind};

/// Outcome of normalizing one table
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub dataset: CanonicalDataset,
    /// One entry per non-empty cell that was replaced by a default
    pub warnings: Vec<String>,
    /// Rows whose id had already been seen
    pub duplicates: usize,
}

/// The built-in normalizer for a kind
pub fn normalizer_for(kind: DatasetKind) -> Box<dyn KindNormalizer> {
    match kind {
        DatasetKind::Participation => Box::new(normalizers::ParticipationNormalizer::new()),
        DatasetKind::Popularity => Box::new(normalizers::PopularityNormalizer::new()),
        DatasetKind::Controversy => Box::new(normalizers::ControversyNormalizer::new()),
    }
}

/// Normalize tokenized rows (row 0 is the header)
pub fn normalize(kind: DatasetKind, rows: &[RawRow]) -> Normalized {
    normalizer_for(kind).normalize(&Table::from_rows(rows))
}
