//! Required-field checks, run before any normalization.
//!
//! Failures enumerate every missing field so the caller can show them all at once.

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants;
use crate::error::{IngestError, Result};
use crate::metrics::ValidateMetrics;
use crate::pipeline::processing::parser::json::check_shape;
use crate::types::DatasetKind;

/// What a dataset is validated against
#[derive(Debug, Clone, Copy)]
pub enum SchemaSample<'a> {
    /// Trimmed CSV header row; order is irrelevant
    Header(&'a [String]),
    /// Whole JSON document; list kinds are checked on their first element
    Json(&'a Value),
}

/// Fields a kind must carry for the given sample type
pub fn required_fields(kind: DatasetKind, sample: &SchemaSample<'_>) -> &'static [&'static str] {
    match (kind, sample) {
        (DatasetKind::Participation, _) => constants::PARTICIPATION_REQUIRED,
        (DatasetKind::Popularity, _) => constants::POPULARITY_REQUIRED,
        (DatasetKind::Controversy, SchemaSample::Json(_)) => constants::CONTROVERSY_JSON_REQUIRED,
        // Edge-row CSVs are accepted as-is
        (DatasetKind::Controversy, SchemaSample::Header(_)) => &[],
    }
}

/// Required fields absent from the sample, in declaration order
pub fn missing_fields(kind: DatasetKind, sample: &SchemaSample<'_>) -> Vec<String> {
    let required = required_fields(kind, sample);
    let present = |field: &str| -> bool {
        match sample {
            SchemaSample::Header(headers) => headers.iter().any(|h| h == field),
            SchemaSample::Json(value) => json_sample(kind, value)
                .and_then(Value::as_object)
                .map(|obj| obj.get(field).is_some_and(|v| !v.is_null()))
                .unwrap_or(false),
        }
    };
    required
        .iter()
        .filter(|field| !present(**field))
        .map(|field| field.to_string())
        .collect()
}

/// The object whose keys are checked: the first element for list kinds
/// (an empty list has no keys), the document itself for controversy
fn json_sample(kind: DatasetKind, value: &Value) -> Option<&Value> {
    match kind {
        DatasetKind::Participation | DatasetKind::Popularity => value.as_array()?.first(),
        DatasetKind::Controversy => Some(value),
    }
}

pub struct SchemaValidator;

impl SchemaValidator {
    pub fn validate(kind: DatasetKind, sample: SchemaSample<'_>) -> Result<()> {
        if let SchemaSample::Json(value) = sample {
            check_shape(kind, value)?;
        }

        if matches!(
            (kind, &sample),
            (DatasetKind::Controversy, SchemaSample::Header(_))
        ) {
            Self::note_controversy_header(sample);
        }

        let missing = missing_fields(kind, &sample);
        if missing.is_empty() {
            debug!("{} dataset passed schema validation", kind);
            ValidateMetrics::record_accepted(kind.as_str());
            return Ok(());
        }

        warn!("{} dataset is missing required fields: {}", kind, missing.join(", "));
        ValidateMetrics::record_schema_violation(kind.as_str(), missing.len());
        Err(IngestError::SchemaViolation { kind, missing })
    }

    pub fn validate_header(kind: DatasetKind, headers: &[String]) -> Result<()> {
        Self::validate(kind, SchemaSample::Header(headers))
    }

    pub fn validate_json(kind: DatasetKind, value: &Value) -> Result<()> {
        Self::validate(kind, SchemaSample::Json(value))
    }

    fn note_controversy_header(sample: SchemaSample<'_>) {
        if let SchemaSample::Header(headers) = sample {
            for column in ["source_id", "target_id"] {
                if !headers.iter().any(|h| h == column) {
                    warn!("controversy CSV has no `{}` column; every edge will have an empty endpoint", column);
                }
            }
        }
    }
}
