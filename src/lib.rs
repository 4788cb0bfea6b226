#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod errors;
pub mod integrate;
pub mod loader;
pub mod motion;
pub mod pipeline;
pub mod record;
pub mod resolution;

pub use errors::{
    ConfigurationError, IntegrationError, LoadError, RecordError, SubmissionError,
};
pub use integrate::{integrate_quantities, simpson, EvenSamples, IntegratedQuantities};
pub use loader::{load, parse_table, Submission, Table};
pub use motion::Motion;
pub use pipeline::{
    Campaign, Contribution, GroupAccumulator, MotionReduction, Outcome, Participant,
    ReductionReport, SeriesStyle, CYLINDER,
};
pub use record::{
    is_close, process, validate, ParticipantIntegrals, ProcessedRecord, TimeHistory,
    ValidationFailure,
};
pub use resolution::{
    max_t_in, select_max_h, select_max_p, select_max_t, GroupConfig, IndexKind, ResolutionIndex,
};
