//! Error and warning types for qPCR ΔΔCt analysis

use std::fmt;

use thiserror::Error;

/// Fatal errors; any of these aborts the run
#[derive(Error, Debug)]
pub enum QpcrError {
    #[error("Malformed well label '{label}' at row {row}: expected <letters><digits>, e.g. A12")]
    MalformedWellLabel { label: String, row: usize },

    #[error("Missing required column: {column}")]
    MissingRequiredColumn { column: String },

    #[error("Invalid Ct value '{value}' at row {row}")]
    InvalidCtValue { value: String, row: usize },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for qPCR operations
pub type Result<T> = std::result::Result<T, QpcrError>;

/// Non-fatal conditions reported alongside a completed analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisWarning {
    /// A configured housekeeping gene or control condition never occurs in the data.
    /// Every downstream value depending on it will be missing.
    AmbiguousConfiguration { field: &'static str, value: String },

    /// Rows whose group key has no housekeeping or control counterpart
    UnmatchedGroupKey {
        stage: &'static str,
        key: String,
        n_rows: usize,
    },
}

impl AnalysisWarning {
    /// One `UnmatchedGroupKey` per unmatched key, ordered by key description
    pub fn unmatched<K, I, F>(stage: &'static str, unmatched: I, describe: F) -> Vec<Self>
    where
        I: IntoIterator<Item = (K, usize)>,
        F: Fn(&K) -> String,
    {
        let mut warnings: Vec<Self> = unmatched
            .into_iter()
            .map(|(key, n_rows)| AnalysisWarning::UnmatchedGroupKey {
                stage,
                key: describe(&key),
                n_rows,
            })
            .collect();
        warnings.sort_by(|a, b| match (a, b) {
            (
                AnalysisWarning::UnmatchedGroupKey { key: ka, .. },
                AnalysisWarning::UnmatchedGroupKey { key: kb, .. },
            ) => ka.cmp(kb),
            _ => std::cmp::Ordering::Equal,
        });
        warnings
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::AmbiguousConfiguration { field, value } => write!(
                f,
                "configured {} '{}' does not occur in the data; dependent values will be missing",
                field, value
            ),
            AnalysisWarning::UnmatchedGroupKey { stage, key, n_rows } => write!(
                f,
                "{}: no reference group for key {} ({} rows left without a value)",
                stage, key, n_rows
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_offending_value() {
        let err = QpcrError::MalformedWellLabel {
            label: "XY".to_string(),
            row: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("'XY'"));
        assert!(msg.contains("row 3"));

        let err = QpcrError::MissingRequiredColumn {
            column: "ct_value".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required column: ct_value");
    }

    #[test]
    fn test_warning_display() {
        let w = AnalysisWarning::UnmatchedGroupKey {
            stage: "housekeeping",
            key: "(LPS, 48h)".to_string(),
            n_rows: 4,
        };
        assert_eq!(
            w.to_string(),
            "housekeeping: no reference group for key (LPS, 48h) (4 rows left without a value)"
        );
    }
}
