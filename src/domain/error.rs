// ============================================================
// Layer 3 - Pipeline Errors
// ============================================================
// Every failure the library layers can report. All of them are
// terminal for a run: the application layer wraps them with
// context and the process exits non-zero.
//
//   FileNotFound     - input path does not exist
//   Parse            - malformed header, ragged row, bad cell
//   InvalidColumn    - column with no usable values (no median)
//   UndefinedMetric  - R² or a mean over an empty/constant target
//
// The remaining variants cover configuration, persistence and
// shape checks around the four core stages.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the domain, data, ml and infra layers
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("undefined metric {metric}: {reason}")]
    UndefinedMetric { metric: &'static str, reason: String },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} partition is empty")]
    EmptyPartition(&'static str),

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Shorthand for a parse failure on a given 1-based file line
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_column() {
        let err = PipelineError::InvalidColumn {
            column: "Votes".into(),
            reason: "no non-missing values".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid column 'Votes': no non-missing values"
        );
    }

    #[test]
    fn test_parse_helper() {
        let err = PipelineError::parse(7, "bad number");
        assert!(matches!(err, PipelineError::Parse { line: 7, .. }));
    }
}
