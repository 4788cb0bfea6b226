//! Error types produced while reducing participant submissions.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolution::IndexKind;

/// Error returned when a group's configuration cannot be used.
///
/// These are the only fatal conditions of a reduction run: without a usable
/// resolution there is no submission to look for, so the run stops.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Returned when the configuration file cannot be read.
    #[error("cannot read configuration {path}: {source}")]
    Unreadable {
        /// Location of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when the configuration file is not valid JSON.
    #[error("cannot parse configuration {path}: {source}")]
    Malformed {
        /// Location of the configuration file.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// Returned when no index token of the requested kind is declared.
    #[error("no '{kind}'-index descriptors detected in data set json configuration")]
    NoResolution {
        /// The index family that had no declared level.
        kind: IndexKind,
    },
}

/// Error returned when a submission file exists but cannot be parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Returned when the file cannot be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Location of the data file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when a field is not a floating point number.
    #[error("{path}:{line}: invalid number {field:?}: {source}")]
    InvalidNumber {
        /// Location of the data file.
        path: PathBuf,
        /// One-based line number of the offending row.
        line: usize,
        /// The raw field text.
        field: String,
        /// Underlying parse failure.
        #[source]
        source: std::num::ParseFloatError,
    },
    /// Returned when a row has a different number of fields than the first row.
    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    RaggedRow {
        /// Location of the data file.
        path: PathBuf,
        /// One-based line number of the offending row.
        line: usize,
        /// Field count of the first data row.
        expected: usize,
        /// Field count of the offending row.
        found: usize,
    },
}

/// Error returned when a parsed table does not have the time-history layout.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Returned when the table does not have exactly five columns.
    #[error("expected 5 columns (time, y-force, work, mass, mass error), found {0}")]
    ColumnCount(usize),
    /// Returned when no time samples remain.
    #[error("data set contains no time samples")]
    Empty,
}

/// Error returned by the quadrature routines.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IntegrationError {
    /// Returned when the integrand and the abscissae differ in length.
    #[error("integrand has {values} samples but time axis has {times}")]
    LengthMismatch {
        /// Number of time samples.
        times: usize,
        /// Number of integrand samples.
        values: usize,
    },
}

/// Error that removes a single submission from the reduction without ending the run.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The data file could not be parsed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The parsed table does not have the time-history layout.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// The series could not be integrated.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
