//! Prescribed motion cases and their canonical time domains.

use std::fmt;

/// Canonical end time of each motion case. Motions missing from this table
/// are accepted without an end-time check.
const CANONICAL_END_TIMES: &[(&str, f64)] = &[("M1", 1.0), ("M2", 40.0)];

/// A named prescribed-motion test case such as `M1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Motion(
    /// Identifier used in file names.
    String,
);

impl Motion {
    /// Create a motion from its identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The first motion case, ending at `t = 1`.
    #[must_use]
    pub fn m1() -> Self {
        Self::new("M1")
    }

    /// The second motion case, ending at `t = 40`.
    #[must_use]
    pub fn m2() -> Self {
        Self::new("M2")
    }

    /// Identifier used in file names, e.g. `M1`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Time at which a complete record of this motion must end.
    ///
    /// # Examples
    /// ```
    /// use cylinder_histories::Motion;
    ///
    /// assert_eq!(Motion::m2().canonical_end_time(), Some(40.0));
    /// assert_eq!(Motion::new("M3").canonical_end_time(), None);
    /// ```
    #[must_use]
    pub fn canonical_end_time(&self) -> Option<f64> {
        CANONICAL_END_TIMES
            .iter()
            .find(|(name, _)| *name == self.0)
            .map(|&(_, end)| end)
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_motions_have_end_times() {
        assert_eq!(Motion::m1().canonical_end_time(), Some(1.0));
        assert_eq!(Motion::new("M2"), Motion::m2());
        assert_eq!(Motion::m1().to_string(), "M1");
    }
}
