//! Locating and parsing participant data files.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::{debug, warn};

use crate::errors::LoadError;
use crate::motion::Motion;
use crate::resolution::{ResolutionIndex, DATA_EXTENSION};

/// Raw numeric table read from a data file, one row per line.
pub type Table = Array2<f64>;

/// One participant submission, identified by group, case and resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Submitting group, also the name of its directory.
    pub group: String,
    /// Geometry of the case, e.g. `Cylinder`.
    pub geometry: String,
    /// Prescribed motion.
    pub motion: Motion,
    /// Mesh refinement level.
    pub h: ResolutionIndex,
    /// Polynomial order.
    pub p: ResolutionIndex,
    /// Time-step level.
    pub t: ResolutionIndex,
}

impl Submission {
    /// Canonical file name, `<Geometry>-<Motion>-<h>-<p>-<t>.txt`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}{}",
            self.geometry, self.motion, self.h, self.p, self.t, DATA_EXTENSION
        )
    }

    /// Location of the submission relative to `root`.
    #[must_use]
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.group).join(self.file_name())
    }

    /// Resolution triple as shown in legends, e.g. `h3-p4-t2`.
    #[must_use]
    pub fn resolution_label(&self) -> String {
        format!("{}-{}-{}", self.h, self.p, self.t)
    }
}

/// Load a submission's data file from under `root`.
///
/// A missing file is not an error: a diagnostic is logged and `Ok(None)` is
/// returned so the caller can skip this submission.
///
/// # Errors
///
/// Returns [`LoadError`] when the file exists but cannot be read or parsed.
pub fn load(root: &Path, submission: &Submission) -> Result<Option<Table>, LoadError> {
    let path = submission.path(root);
    if !path.is_file() {
        warn!("Data not found: {}", path.display());
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let table = parse_table(&text, &path)?;
    debug!(
        "read {} rows x {} columns from {}",
        table.nrows(),
        table.ncols(),
        path.display()
    );
    Ok(Some(table))
}

/// Parse comma-delimited text, skipping the header line.
///
/// Blank lines and `#` comments are ignored. The result is always two
/// dimensional, even for a single data row; a header-only input gives a table
/// with no rows.
///
/// # Errors
///
/// Returns [`LoadError::InvalidNumber`] for fields that are not numbers and
/// [`LoadError::RaggedRow`] when rows differ in length. `path` is only used
/// for error messages.
pub fn parse_table(text: &str, path: &Path) -> Result<Table, LoadError> {
    let mut values = Vec::new();
    let mut columns: Option<usize> = None;
    let mut rows = 0;

    for (idx, raw) in text.lines().enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_number = idx + 1;
        let start = values.len();
        for field in line.split(',') {
            let field = field.trim();
            let value = field
                .parse::<f64>()
                .map_err(|source| LoadError::InvalidNumber {
                    path: path.to_path_buf(),
                    line: line_number,
                    field: field.to_string(),
                    source,
                })?;
            values.push(value);
        }
        let found = values.len() - start;
        let expected = *columns.get_or_insert(found);
        if found != expected {
            return Err(LoadError::RaggedRow {
                path: path.to_path_buf(),
                line: line_number,
                expected,
                found,
            });
        }
        rows += 1;
    }

    let shape = (rows, columns.unwrap_or(0));
    Ok(Array2::from_shape_vec(shape, values).expect("row lengths checked while parsing"))
}
