//! I/O error types for cedar-io.

use std::path::PathBuf;

use cedar_tree::TreeError;

/// Errors from dataset reading, imputation, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the header section is missing or cannot be understood.
    #[error("malformed header in {path} at line {line}: {reason}")]
    MalformedHeader {
        /// Path to the input file.
        path: PathBuf,
        /// One-based line number (0 when the whole header is absent).
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Returned when a data row has a different number of values than there are attributes.
    #[error("inconsistent row length in {path}: row {row_index} has {got} values, expected {expected}")]
    InconsistentRowLength {
        /// Path to the input file.
        path: PathBuf,
        /// Zero-based data row index.
        row_index: usize,
        /// Expected number of values (attributes plus class).
        expected: usize,
        /// Actual number of values in this row.
        got: usize,
    },

    /// Returned when the file declares its attributes but holds zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when the requested class column is not in the header.
    #[error("class column \"{column}\" not found in {path}")]
    UnknownClassColumn {
        /// Path to the input file.
        path: PathBuf,
        /// The requested column name.
        column: String,
    },

    /// Returned when a missing-value policy name is not recognised.
    #[error("unknown missing-value policy \"{name}\": expected mode_by_class or keep")]
    UnknownMissingPolicy {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be encoded as JSON.
    #[error("cannot serialize {what}")]
    Serialize {
        /// Which artifact was being encoded.
        what: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the parsed rows do not form a valid dataset.
    #[error(transparent)]
    Dataset(#[from] TreeError),
}
