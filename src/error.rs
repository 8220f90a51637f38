use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A single record could not be normalized and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("unknown publication type `{label}`")]
    UnknownPublicationType { label: String },
    #[error("invalid weight {weight}: must be a finite, non-negative number")]
    InvalidWeight { weight: String },
    #[error("record does not match the expected shape: {reason}")]
    Shape { reason: String },
}

/// A publication timestamp that none of the accepted formats could parse.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("malformed timestamp `{raw}`")]
pub struct MalformedTimestampError {
    pub raw: String,
}

/// Why a record is missing from (part of) a result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordIssue {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("{0}; counted in overall only")]
    MalformedTimestamp(#[from] MalformedTimestampError),
    #[error("unrecognized member type `{label}`; excluded from every bucket")]
    UnrecognizedMemberType { label: String },
}

/// One per-record diagnostic, keyed by the record's index in its batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("record {position}: {issue}")]
pub struct RecordDiagnostic {
    pub position: usize,
    pub issue: RecordIssue,
}

impl RecordDiagnostic {
    pub fn new(position: usize, issue: impl Into<RecordIssue>) -> Self {
        Self {
            position,
            issue: issue.into(),
        }
    }
}

/// Every diagnostic collected for a batch. Warning-level: the partial
/// result it accompanies is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} record(s) reported while processing the batch", .diagnostics.len())]
pub struct AggregateValidationError {
    pub diagnostics: Vec<RecordDiagnostic>,
}

/// The batch itself is unusable; nothing can be rendered from it.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected an array of records, got null")]
    Null,
    #[error("expected an array of records, got {found}")]
    NotAnArray { found: &'static str },
}

/// Reading a batch from disk failed before any record could be processed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid CSV header in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("unsupported input format for {}; expected .json or .csv", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error(transparent)]
    Input(#[from] InputError),
}
