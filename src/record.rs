//! Splitting raw tables into time histories and validating their time domain.

use std::fmt;

use ndarray::{s, ArrayView2};

use crate::errors::RecordError;
use crate::motion::Motion;

/// Number of columns in every submission table.
pub const COLUMNS: usize = 5;

/// Absolute tolerance used when comparing time stamps.
const TIME_ABS_TOLERANCE: f64 = 1.0e-8;
/// Relative tolerance used when comparing time stamps.
const TIME_REL_TOLERANCE: f64 = 1.0e-5;

/// Whether `a` is close to `b`, using the asymmetric `|a - b| <= atol + rtol * |b|` test.
#[must_use]
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_ABS_TOLERANCE + TIME_REL_TOLERANCE * b.abs()
}

/// The five parallel series of a submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeHistory {
    /// Sample times.
    pub time: Vec<f64>,
    /// Y-component of the force on the cylinder.
    pub y_force: Vec<f64>,
    /// Integrand of the work done by the motion.
    pub work: Vec<f64>,
    /// Mass in the domain.
    pub mass: Vec<f64>,
    /// Mass conservation error.
    pub mass_error: Vec<f64>,
}

impl TimeHistory {
    /// Number of time samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the history holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// First sample time.
    #[must_use]
    pub fn start_time(&self) -> Option<f64> {
        self.time.first().copied()
    }

    /// Last sample time.
    #[must_use]
    pub fn end_time(&self) -> Option<f64> {
        self.time.last().copied()
    }
}

/// Integrated quantities precomputed by the submitting group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticipantIntegrals {
    /// Time integral of the y-force.
    pub y_force: f64,
    /// Total work.
    pub work: f64,
    /// Time integral of the mass.
    pub mass: f64,
    /// Time integral of the mass error.
    pub mass_error: f64,
}

/// Reason a time history failed validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValidationFailure {
    /// The first sample is not at `t = 0`.
    StartTime {
        /// Observed first sample time.
        found: f64,
    },
    /// The last sample is not at the motion's canonical end time.
    EndTime {
        /// Canonical end time of the motion.
        expected: f64,
        /// Observed last sample time.
        found: f64,
    },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::StartTime { found } => {
                write!(f, "start-time for data-set is {found}, not 0")
            }
            ValidationFailure::EndTime { expected, found } => {
                write!(f, "end-time for data-set is {found}, not {expected}")
            }
        }
    }
}

/// Outcome of processing one submission table.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedRecord {
    /// Series with any synthetic trailing row removed.
    pub history: TimeHistory,
    /// Integrals appended by the participant, when present.
    pub participant_integrals: Option<ParticipantIntegrals>,
    /// Validation failures; empty when the record may be used.
    pub failures: Vec<ValidationFailure>,
}

impl ProcessedRecord {
    /// Whether the record failed validation and must not be used downstream.
    #[must_use]
    pub fn skip(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Split a raw table into a [`TimeHistory`] and validate its time domain.
///
/// A trailing row whose time is NaN is taken as participant-supplied integrals
/// and removed. The history is returned even when validation fails so callers
/// can report on it; check [`ProcessedRecord::skip`] before using it.
///
/// # Errors
///
/// Returns [`RecordError::ColumnCount`] when the table is not five columns
/// wide and [`RecordError::Empty`] when no time samples remain.
///
/// # Examples
/// ```
/// use cylinder_histories::{process, Motion};
/// use ndarray::array;
///
/// let table = array![
///     [0.0, 0.0, 0.0, 1.0, 0.0],
///     [1.0, 0.0, 0.0, 1.0, 0.0],
///     [f64::NAN, 0.1, 0.2, 1.0, 0.0],
/// ];
/// let record = process(table.view(), &Motion::m1()).unwrap();
/// assert!(!record.skip());
/// assert_eq!(record.history.len(), 2);
/// assert_eq!(record.participant_integrals.unwrap().work, 0.2);
/// ```
pub fn process(table: ArrayView2<'_, f64>, motion: &Motion) -> Result<ProcessedRecord, RecordError> {
    if table.nrows() == 0 {
        return Err(RecordError::Empty);
    }
    if table.ncols() != COLUMNS {
        return Err(RecordError::ColumnCount(table.ncols()));
    }

    let mut rows = table;
    let mut participant_integrals = None;
    let last = table.row(table.nrows() - 1);
    if last[0].is_nan() {
        participant_integrals = Some(ParticipantIntegrals {
            y_force: last[1],
            work: last[2],
            mass: last[3],
            mass_error: last[4],
        });
        rows = table.slice_move(s![..-1, ..]);
    }
    if rows.nrows() == 0 {
        return Err(RecordError::Empty);
    }

    let column = |idx: usize| rows.column(idx).to_vec();
    let history = TimeHistory {
        time: column(0),
        y_force: column(1),
        work: column(2),
        mass: column(3),
        mass_error: column(4),
    };
    let failures = validate(&history, motion);

    Ok(ProcessedRecord {
        history,
        participant_integrals,
        failures,
    })
}

/// Check the first and last sample times against the motion's time domain.
#[must_use]
pub fn validate(history: &TimeHistory, motion: &Motion) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    if let Some(start) = history.start_time() {
        if !is_close(start, 0.0) {
            failures.push(ValidationFailure::StartTime { found: start });
        }
    }
    if let (Some(expected), Some(found)) = (motion.canonical_end_time(), history.end_time()) {
        if !is_close(found, expected) {
            failures.push(ValidationFailure::EndTime { expected, found });
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;

    fn table(times: &[f64]) -> Array2<f64> {
        let mut table = Array2::zeros((times.len(), COLUMNS));
        for (row, &time) in times.iter().enumerate() {
            table[[row, 0]] = time;
            table[[row, 1]] = time.sin();
            table[[row, 2]] = 2.0 * time;
            table[[row, 3]] = 1.0;
            table[[row, 4]] = 1.0e-12 * time;
        }
        table
    }

    #[test]
    fn valid_table_is_kept() {
        let record = process(table(&[0.0, 0.25, 0.5, 0.75, 1.0]).view(), &Motion::m1())
            .expect("valid layout");
        assert!(!record.skip());
        assert!(record.participant_integrals.is_none());
        let history = &record.history;
        assert_eq!(history.len(), 5);
        for series in [
            &history.y_force,
            &history.work,
            &history.mass,
            &history.mass_error,
        ] {
            assert_eq!(series.len(), history.time.len());
        }
        assert_eq!(history.work[4], 2.0);
    }

    #[test]
    fn late_start_is_skipped() {
        let record = process(table(&[0.1, 0.5, 1.0]).view(), &Motion::m1()).expect("valid layout");
        assert!(record.skip());
        assert_eq!(
            record.failures,
            vec![ValidationFailure::StartTime { found: 0.1 }]
        );
        assert_eq!(record.history.len(), 3);
    }

    #[test]
    fn wrong_end_time_is_skipped_per_motion() {
        let m1_short = process(table(&[0.0, 0.45, 0.9]).view(), &Motion::m1()).unwrap();
        assert_eq!(
            m1_short.failures,
            vec![ValidationFailure::EndTime {
                expected: 1.0,
                found: 0.9
            }]
        );

        let m2_as_m1 = process(table(&[0.0, 0.5, 1.0]).view(), &Motion::m2()).unwrap();
        assert!(m2_as_m1.skip());

        let m2 = process(table(&[0.0, 20.0, 40.0]).view(), &Motion::m2()).unwrap();
        assert!(!m2.skip());
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let record = process(table(&[1.0e-10, 0.5, 1.0 + 1.0e-7]).view(), &Motion::m1()).unwrap();
        assert!(!record.skip());
    }

    #[test]
    fn motions_without_end_time_only_check_start() {
        let record = process(table(&[0.0, 3.0, 7.5]).view(), &Motion::new("M3")).unwrap();
        assert!(!record.skip());
    }

    #[test]
    fn trailing_integrals_row_is_extracted() {
        let mut rows = table(&[0.0, 0.5, 1.0]);
        let original = rows.clone();
        rows.push_row(ndarray::ArrayView1::from(&[f64::NAN, 1.5, -2.5, 3.25, 1.0e-9]))
            .unwrap();

        let record = process(rows.view(), &Motion::m1()).expect("valid layout");
        assert_eq!(
            record.participant_integrals,
            Some(ParticipantIntegrals {
                y_force: 1.5,
                work: -2.5,
                mass: 3.25,
                mass_error: 1.0e-9,
            })
        );
        assert_eq!(record.history.time, original.column(0).to_vec());
        assert_eq!(record.history.mass_error, original.column(4).to_vec());
        assert!(!record.skip());
    }

    #[test]
    fn structural_problems_are_errors() {
        let narrow = array![[0.0, 1.0, 2.0], [1.0, 1.0, 2.0]];
        assert_eq!(
            process(narrow.view(), &Motion::m1()),
            Err(RecordError::ColumnCount(3))
        );

        let only_integrals = array![[f64::NAN, 1.0, 2.0, 3.0, 4.0]];
        assert_eq!(
            process(only_integrals.view(), &Motion::m1()),
            Err(RecordError::Empty)
        );

        let empty = Array2::<f64>::zeros((0, COLUMNS));
        assert_eq!(process(empty.view(), &Motion::m1()), Err(RecordError::Empty));
    }

    #[test]
    fn closeness_is_relative_to_expected_value() {
        assert!(is_close(40.0 + 3.0e-4, 40.0));
        assert!(!is_close(40.0 + 1.0e-3, 40.0));
        assert!(!is_close(1.0e-7, 0.0));
    }
}
