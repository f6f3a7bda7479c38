use crate::core::race::RaceStatus;
use thiserror::Error;

/// SimError is returned if the race configuration does not fulfill the posed requirements or if
/// the race engine is used in a state that does not allow the requested operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("track {track}: section lengths sum to {sum_ft:.1}ft but track length is {length_ft:.1}ft")]
    SectionLengthMismatch {
        track: String,
        sum_ft: f64,
        length_ft: f64,
    },
    #[error("track {track}: turn section {section} is missing banking or radius")]
    TurnGeometryMissing { track: String, section: usize },
    #[error("track {track}: {field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    TrackRangeViolation {
        track: String,
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("track {track} has no sections")]
    NoSections { track: String },
    #[error("race must have at least one lap")]
    NoLaps,
    #[error("number of entrants must be between 1 and {max} (got {count})")]
    EntrantCount { count: usize, max: usize },
    #[error("driver id {0} is used by more than one entrant")]
    DuplicateDriver(String),
    #[error("driver {driver}: {field} must be between 0 and 100 (got {value:.2})")]
    SkillRange {
        driver: String,
        field: &'static str,
        value: f64,
    },
    #[error("driver {driver}: start position {position} is invalid for a field of {count}")]
    StartPosition {
        driver: String,
        position: u32,
        count: usize,
    },
    #[error("unknown driver id {0}")]
    UnknownDriver(String),
    #[error("cannot {action} while race is {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: RaceStatus,
    },
    #[error("race results are only available once the race is completed (status {status:?})")]
    RaceNotCompleted { status: RaceStatus },
}
