use rep_counter_core::{CalibrationError, Exercise};

/// Errors returned by detector construction and session control actions.
///
/// None of these are raised while processing frames: per-frame problems
/// (missing landmarks, missing calibration) only hold the current state.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid detector parameter `{name}`: {reason}")]
    InvalidParams { name: &'static str, reason: String },
    #[error("{exercise} cannot be counted with a {family} detector")]
    FamilyMismatch {
        exercise: Exercise,
        family: &'static str,
    },
    #[error("tracked landmarks are not visible; reference not set")]
    ReferenceUnavailable,
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}
