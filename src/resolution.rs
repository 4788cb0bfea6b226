//! Selection of the highest-resolution submission a group has provided.
//!
//! Submissions are indexed by three discretization tokens: mesh refinement
//! (`h0`..`h5`), polynomial order (`p0`..`p6`) and time-step level
//! (`t0`..`t5`). The `h` and `p` levels a group supports are declared in its
//! configuration file; the `t` level is discovered from the files on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::ConfigurationError;

/// Extension shared by every submission data file.
pub const DATA_EXTENSION: &str = ".txt";

/// Family of a discretization index token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKind {
    /// Mesh refinement level.
    H,
    /// Polynomial or solution order.
    P,
    /// Time-step resolution level.
    T,
}

impl IndexKind {
    /// Token prefix used in configuration keys and file names.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            IndexKind::H => 'h',
            IndexKind::P => 'p',
            IndexKind::T => 't',
        }
    }

    /// Highest level a token of this family may carry.
    #[must_use]
    pub const fn max_level(self) -> u8 {
        match self {
            IndexKind::H => 5,
            IndexKind::P => 6,
            IndexKind::T => 5,
        }
    }

    /// All tokens of this family, highest priority first.
    pub fn descending(self) -> impl Iterator<Item = ResolutionIndex> {
        (0..=self.max_level())
            .rev()
            .map(move |level| ResolutionIndex { kind: self, level })
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// A single discretization token such as `h4` or `t2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolutionIndex {
    /// Token family.
    kind: IndexKind,
    /// Level within the family.
    level: u8,
}

impl ResolutionIndex {
    /// Create a token, or `None` when `level` exceeds the family's range.
    ///
    /// # Examples
    /// ```
    /// use cylinder_histories::{IndexKind, ResolutionIndex};
    ///
    /// let h4 = ResolutionIndex::new(IndexKind::H, 4).expect("h4 is in range");
    /// assert_eq!(h4.to_string(), "h4");
    /// assert!(ResolutionIndex::new(IndexKind::H, 6).is_none());
    /// ```
    #[must_use]
    pub fn new(kind: IndexKind, level: u8) -> Option<Self> {
        (level <= kind.max_level()).then_some(Self { kind, level })
    }

    /// The lowest token of a family, e.g. `t0`.
    #[must_use]
    pub const fn lowest(kind: IndexKind) -> Self {
        Self { kind, level: 0 }
    }

    /// Parse a token written as `<prefix><level>`.
    #[must_use]
    pub fn parse(kind: IndexKind, token: &str) -> Option<Self> {
        let digits = token.strip_prefix(kind.prefix())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(kind, digits.parse().ok()?)
    }

    /// Family of the token.
    #[must_use]
    pub const fn kind(self) -> IndexKind {
        self.kind
    }

    /// Numeric level of the token.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.level
    }
}

impl fmt::Display for ResolutionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.level)
    }
}

/// Declared capabilities of a participating group, read from `<Geometry>.json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GroupConfig {
    /// Raw configuration entries keyed by index token.
    entries: BTreeMap<String, Value>,
}

impl GroupConfig {
    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Unreadable`] when the file cannot be read and
    /// [`ConfigurationError::Malformed`] when it is not a JSON object.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigurationError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether the configuration declares `token` with a truthy value.
    #[must_use]
    pub fn declares(&self, token: ResolutionIndex) -> bool {
        self.entries
            .get(&token.to_string())
            .map_or(false, is_truthy)
    }

    /// Highest declared token of `kind`.
    fn max_declared(&self, kind: IndexKind) -> Result<ResolutionIndex, ConfigurationError> {
        kind.descending()
            .find(|&token| self.declares(token))
            .ok_or(ConfigurationError::NoResolution { kind })
    }
}

/// Loose truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Highest mesh refinement level declared by a group.
///
/// # Errors
///
/// Returns [`ConfigurationError::NoResolution`] when no `h` token is declared.
///
/// # Examples
/// ```
/// use cylinder_histories::{select_max_h, GroupConfig};
///
/// let config: GroupConfig = serde_json::from_str(r#"{"h2": true, "h4": true}"#).unwrap();
/// assert_eq!(select_max_h(&config).unwrap().to_string(), "h4");
/// ```
pub fn select_max_h(config: &GroupConfig) -> Result<ResolutionIndex, ConfigurationError> {
    config.max_declared(IndexKind::H)
}

/// Highest polynomial order declared by a group.
///
/// # Errors
///
/// Returns [`ConfigurationError::NoResolution`] when no `p` token is declared.
pub fn select_max_p(config: &GroupConfig) -> Result<ResolutionIndex, ConfigurationError> {
    config.max_declared(IndexKind::P)
}

/// Highest time-step level among the data files in a group's directory.
///
/// Files are considered when their name contains both `geometry` and `motion`
/// and ends with [`DATA_EXTENSION`]. When nothing matches, including when the
/// directory cannot be listed, the lowest token `t0` is returned.
#[must_use]
pub fn select_max_t(group_dir: &Path, geometry: &str, motion: &str) -> ResolutionIndex {
    let entries = match fs::read_dir(group_dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!("cannot list {}: {error}", group_dir.display());
            return ResolutionIndex::lowest(IndexKind::T);
        }
    };
    let names = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned());
    max_t_in(names, geometry, motion)
}

/// Highest time-step level found among `file_names`.
///
/// # Examples
/// ```
/// use cylinder_histories::max_t_in;
///
/// let files = ["Cylinder-M1-h3-p4-t2.txt", "Cylinder-M1-h3-p4-t5.txt"];
/// assert_eq!(max_t_in(files, "Cylinder", "M1").to_string(), "t5");
/// ```
pub fn max_t_in<I, S>(file_names: I, geometry: &str, motion: &str) -> ResolutionIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    file_names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            if !(name.contains(geometry) && name.contains(motion)) {
                return None;
            }
            let stem = name.strip_suffix(DATA_EXTENSION)?;
            stem.split('-')
                .filter_map(|segment| ResolutionIndex::parse(IndexKind::T, segment))
                .max()
        })
        .max()
        .unwrap_or(ResolutionIndex::lowest(IndexKind::T))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> GroupConfig {
        serde_json::from_str(json).expect("valid configuration")
    }

    #[test]
    fn picks_highest_declared_h_and_p() {
        let config = config(r#"{"h2": true, "h4": true, "p1": true, "p3": 1}"#);
        assert_eq!(select_max_h(&config).unwrap().to_string(), "h4");
        assert_eq!(select_max_p(&config).unwrap().to_string(), "p3");
    }

    #[test]
    fn falsy_entries_are_not_declared() {
        let config = config(r#"{"h5": false, "h3": 0, "h2": "", "h1": null, "h0": true}"#);
        assert_eq!(select_max_h(&config).unwrap().to_string(), "h0");
    }

    #[test]
    fn empty_configuration_is_fatal() {
        let config = GroupConfig::default();
        let error = select_max_h(&config).expect_err("no h declared");
        assert!(matches!(
            error,
            ConfigurationError::NoResolution { kind: IndexKind::H }
        ));
        let error = select_max_p(&config).expect_err("no p declared");
        assert!(matches!(
            error,
            ConfigurationError::NoResolution { kind: IndexKind::P }
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = config(r#"{"h9": true, "p7": true, "name": "UM", "h1": true}"#);
        assert_eq!(select_max_h(&config).unwrap().to_string(), "h1");
        assert!(select_max_p(&config).is_err());
    }

    #[test]
    fn max_t_filters_on_geometry_motion_and_extension() {
        let files = [
            "Cylinder-M1-h3-p4-t2.txt",
            "Cylinder-M2-h3-p4-t5.txt",
            "Airfoil-M1-h3-p4-t4.txt",
            "Cylinder-M1-h3-p4-t3.dat",
            "Cylinder.json",
        ];
        assert_eq!(max_t_in(files, "Cylinder", "M1").to_string(), "t2");
        assert_eq!(max_t_in(files, "Cylinder", "M2").to_string(), "t5");
    }

    #[test]
    fn max_t_defaults_to_lowest_token() {
        let files: [&str; 0] = [];
        assert_eq!(max_t_in(files, "Cylinder", "M1").to_string(), "t0");
        let missing = Path::new("definitely/not/a/submission/directory");
        assert_eq!(select_max_t(missing, "Cylinder", "M1").to_string(), "t0");
    }

    #[test]
    fn tokens_parse_within_range_only() {
        assert_eq!(
            ResolutionIndex::parse(IndexKind::P, "p6"),
            ResolutionIndex::new(IndexKind::P, 6)
        );
        assert!(ResolutionIndex::parse(IndexKind::T, "t6").is_none());
        assert!(ResolutionIndex::parse(IndexKind::T, "t").is_none());
        assert!(ResolutionIndex::parse(IndexKind::T, "h1").is_none());
    }
}
