/// Domain errors raised by caller-side guards.
///
/// The pod partitioner and the scorecard reconciler never fail; these
/// variants come from the validation helpers and from seating.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}
