//! The per-run reduction context and the (group × motion) loop.
//!
//! [`Campaign::reduce`] walks every participant and motion, selects the
//! highest-resolution submission, validates it and integrates it. Nothing is
//! drawn here: the result is a [`ReductionReport`] that presentation code can
//! render however it likes.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::{ConfigurationError, SubmissionError};
use crate::integrate::{integrate_quantities, EvenSamples, IntegratedQuantities};
use crate::loader::{load, Submission};
use crate::motion::Motion;
use crate::record::{process, ParticipantIntegrals, TimeHistory, ValidationFailure};
use crate::resolution::{select_max_h, select_max_p, select_max_t, GroupConfig};

/// Geometry of the mesh-motion case.
pub const CYLINDER: &str = "Cylinder";

/// Colour and line pattern used for one group's curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Red, green and blue components.
    pub rgb: (u8, u8, u8),
    /// Whether the line is dashed.
    pub dashed: bool,
}

impl SeriesStyle {
    /// A dashed line in the given colour.
    #[must_use]
    pub const fn dashed(red: u8, green: u8, blue: u8) -> Self {
        Self {
            rgb: (red, green, blue),
            dashed: true,
        }
    }

    /// A solid line in the given colour.
    #[must_use]
    pub const fn solid(red: u8, green: u8, blue: u8) -> Self {
        Self {
            rgb: (red, green, blue),
            dashed: false,
        }
    }
}

/// A research group taking part in the comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    /// Group name, also the name of its submission directory.
    pub name: String,
    /// Style of the group's curves.
    pub style: SeriesStyle,
}

impl Participant {
    /// Create a participant.
    #[must_use]
    pub fn new(name: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }
}

/// Mutable state carried for one group while its motions are reduced.
///
/// Every field is overwritten at the start of each (group, motion) iteration
/// and only read later in that same iteration.
#[derive(Clone, Debug)]
pub struct GroupAccumulator {
    /// Configuration read for the current iteration.
    pub config: GroupConfig,
    /// Integrals computed in the current iteration, if it got that far.
    pub integrals: Option<IntegratedQuantities>,
    /// Rendering style of the group.
    pub style: SeriesStyle,
}

impl GroupAccumulator {
    /// Fresh state for a group drawn in `style`.
    #[must_use]
    pub fn new(style: SeriesStyle) -> Self {
        Self {
            config: GroupConfig::default(),
            integrals: None,
            style,
        }
    }
}

/// A validated and integrated submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    /// The submission the data came from.
    pub submission: Submission,
    /// Style of the submitting group.
    pub style: SeriesStyle,
    /// Validated time history.
    pub history: TimeHistory,
    /// Integrals computed from the history.
    pub integrals: IntegratedQuantities,
    /// Integrals supplied by the group, when present.
    pub participant_integrals: Option<ParticipantIntegrals>,
}

impl Contribution {
    /// Legend entry, e.g. `UM: h3-p4-t2`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}: {}",
            self.submission.group,
            self.submission.resolution_label()
        )
    }
}

/// What happened to one (group, motion) pair.
#[derive(Debug)]
pub enum Outcome {
    /// The submission was validated and integrated.
    Included(Contribution),
    /// No data file exists for the selected resolution.
    NotFound {
        /// The submission that was looked for.
        submission: Submission,
        /// Where it was looked for.
        path: PathBuf,
    },
    /// The time domain did not match the motion.
    Skipped {
        /// The offending submission.
        submission: Submission,
        /// Reasons for skipping.
        failures: Vec<ValidationFailure>,
    },
    /// The data file was malformed.
    Rejected {
        /// The offending submission.
        submission: Submission,
        /// Reason for rejection.
        error: SubmissionError,
    },
}

impl Outcome {
    /// The submission this outcome is about.
    #[must_use]
    pub fn submission(&self) -> &Submission {
        match self {
            Outcome::Included(contribution) => &contribution.submission,
            Outcome::NotFound { submission, .. }
            | Outcome::Skipped { submission, .. }
            | Outcome::Rejected { submission, .. } => submission,
        }
    }

    /// The contribution, when the submission was included.
    #[must_use]
    pub fn contribution(&self) -> Option<&Contribution> {
        match self {
            Outcome::Included(contribution) => Some(contribution),
            _ => None,
        }
    }
}

/// All outcomes for one motion, in participant order.
#[derive(Debug)]
pub struct MotionReduction {
    /// The motion case.
    pub motion: Motion,
    /// One outcome per participant.
    pub outcomes: Vec<Outcome>,
}

impl MotionReduction {
    /// Contributions that passed validation.
    pub fn contributions(&self) -> impl Iterator<Item = &Contribution> {
        self.outcomes.iter().filter_map(Outcome::contribution)
    }
}

/// Result of a reduction run.
#[derive(Debug)]
pub struct ReductionReport {
    /// Geometry of the case.
    pub geometry: String,
    /// One entry per motion, in run order.
    pub motions: Vec<MotionReduction>,
}

impl ReductionReport {
    /// The reduction for `motion`, if it was part of the run.
    #[must_use]
    pub fn motion(&self, motion: &Motion) -> Option<&MotionReduction> {
        self.motions.iter().find(|entry| &entry.motion == motion)
    }
}

/// Settings and participants of one reduction run.
#[derive(Clone, Debug)]
pub struct Campaign {
    /// Directory holding one sub-directory per group.
    root: PathBuf,
    /// Geometry of the case.
    geometry: String,
    /// Motions to reduce, in order.
    motions: Vec<Motion>,
    /// Groups to reduce, in order.
    participants: Vec<Participant>,
    /// Quadrature treatment of even sample counts.
    even_samples: EvenSamples,
}

impl Campaign {
    /// A cylinder campaign over motions M1 and M2 with no participants yet.
    ///
    /// # Examples
    /// ```
    /// use cylinder_histories::{Campaign, Participant, SeriesStyle};
    ///
    /// let campaign = Campaign::new("results")
    ///     .with_participant(Participant::new("UM", SeriesStyle::dashed(191, 191, 0)));
    /// assert_eq!(campaign.participants().len(), 1);
    /// ```
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            geometry: CYLINDER.to_string(),
            motions: vec![Motion::m1(), Motion::m2()],
            participants: Vec::new(),
            even_samples: EvenSamples::default(),
        }
    }

    /// Replace the geometry name.
    #[must_use]
    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = geometry.into();
        self
    }

    /// Replace the list of motions.
    #[must_use]
    pub fn with_motions(mut self, motions: Vec<Motion>) -> Self {
        self.motions = motions;
        self
    }

    /// Append a participant.
    #[must_use]
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Select the quadrature treatment of even sample counts.
    #[must_use]
    pub fn with_even_samples(mut self, even_samples: EvenSamples) -> Self {
        self.even_samples = even_samples;
        self
    }

    /// Directory holding the group sub-directories.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Geometry of the case.
    #[must_use]
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    /// Participating groups.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Reduce every (group, motion) pair.
    ///
    /// Missing, invalid and malformed submissions are logged and recorded in
    /// the report; they never stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a group's configuration is missing,
    /// malformed, or declares no `h` or `p` level.
    pub fn reduce(&self) -> Result<ReductionReport, ConfigurationError> {
        let mut motions: Vec<MotionReduction> = self
            .motions
            .iter()
            .map(|motion| MotionReduction {
                motion: motion.clone(),
                outcomes: Vec::with_capacity(self.participants.len()),
            })
            .collect();

        for participant in &self.participants {
            let mut accumulator = GroupAccumulator::new(participant.style);
            for entry in &mut motions {
                let outcome = self.reduce_pair(participant, &entry.motion, &mut accumulator)?;
                entry.outcomes.push(outcome);
            }
        }

        Ok(ReductionReport {
            geometry: self.geometry.clone(),
            motions,
        })
    }

    /// Reduce one (group, motion) pair.
    fn reduce_pair(
        &self,
        participant: &Participant,
        motion: &Motion,
        accumulator: &mut GroupAccumulator,
    ) -> Result<Outcome, ConfigurationError> {
        let group_dir = self.root.join(&participant.name);
        accumulator.config = GroupConfig::load(&group_dir.join(format!("{}.json", self.geometry)))?;
        accumulator.integrals = None;
        accumulator.style = participant.style;

        let submission = Submission {
            group: participant.name.clone(),
            geometry: self.geometry.clone(),
            motion: motion.clone(),
            h: select_max_h(&accumulator.config)?,
            p: select_max_p(&accumulator.config)?,
            t: select_max_t(&group_dir, &self.geometry, motion.name()),
        };
        info!(
            "{} {}: selected resolution {}",
            participant.name,
            motion,
            submission.resolution_label()
        );

        match self.reduce_submission(&submission, accumulator) {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                warn!("{}: {error}. Skipping...", submission.file_name());
                Ok(Outcome::Rejected { submission, error })
            }
        }
    }

    /// Load, validate and integrate one submission.
    fn reduce_submission(
        &self,
        submission: &Submission,
        accumulator: &mut GroupAccumulator,
    ) -> Result<Outcome, SubmissionError> {
        let Some(table) = load(&self.root, submission)? else {
            return Ok(Outcome::NotFound {
                submission: submission.clone(),
                path: submission.path(&self.root),
            });
        };

        let record = process(table.view(), &submission.motion)?;
        if record.skip() {
            for failure in &record.failures {
                warn!("{}: {failure}. Skipping...", submission.file_name());
            }
            return Ok(Outcome::Skipped {
                submission: submission.clone(),
                failures: record.failures,
            });
        }

        let history = record.history;
        let integrals = integrate_quantities(
            &history.time,
            &history.y_force,
            &history.work,
            &history.mass,
            self.even_samples,
        )?;
        accumulator.integrals = Some(integrals);
        info!(
            "{} {}: Y-Force {:e}, Work {:e}, Mass {:e}",
            submission.group, submission.motion, integrals.y_force, integrals.work, integrals.mass
        );

        Ok(Outcome::Included(Contribution {
            submission: submission.clone(),
            style: accumulator.style,
            history,
            integrals,
            participant_integrals: record.participant_integrals,
        }))
    }
}
