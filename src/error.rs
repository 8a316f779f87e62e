use thiserror::Error;
use uuid::Uuid;

use crate::types::{DatasetKind, InputFormat};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Input is {size} bytes, over the {limit}-byte limit")]
    OversizeInput { size: u64, limit: u64 },

    #[error("Malformed {format} input: {message}")]
    MalformedSyntax { format: InputFormat, message: String },

    #[error("{kind} dataset is missing required fields: {}", .missing.join(", "))]
    SchemaViolation {
        kind: DatasetKind,
        missing: Vec<String>,
    },

    #[error("{kind} dataset must be {expected}")]
    UnexpectedShape {
        kind: DatasetKind,
        expected: &'static str,
    },

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown dataset kind: {0}")]
    UnknownKind(String),

    #[error("Handoff {0} was already consumed or never issued")]
    HandoffMissing(Uuid),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure classes a consumer renders differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    OversizeInput,
    MalformedSyntax,
    SchemaViolation,
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::OversizeInput => "oversize_input",
            ErrorClass::MalformedSyntax => "malformed_syntax",
            ErrorClass::SchemaViolation => "schema_violation",
            ErrorClass::Internal => "internal",
        }
    }
}

impl IngestError {
    pub fn class(&self) -> ErrorClass {
        match self {
            IngestError::OversizeInput { .. } => ErrorClass::OversizeInput,
            IngestError::MalformedSyntax { .. } | IngestError::UnsupportedFormat(_) => {
                ErrorClass::MalformedSyntax
            }
            IngestError::SchemaViolation { .. } | IngestError::UnexpectedShape { .. } => {
                ErrorClass::SchemaViolation
            }
            _ => ErrorClass::Internal,
        }
    }

    pub(crate) fn malformed(format: InputFormat, message: impl Into<String>) -> Self {
        IngestError::MalformedSyntax {
            format,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
