use thiserror::Error;

/// A mutation of a variable that would leave its bounds inconsistent.
///
/// Variable errors never escape a propagator: they are turned into an
/// [`Inconsistency`](super::Inconsistency) through `?` and the propagator fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableError {
    #[error("the domain of an integer variable became empty")]
    EmptyDomain,
    #[error("the lower bound of a set variable is no longer contained in its upper bound")]
    LowerNotInUpper,
    #[error("the cardinality bounds of a set variable are inconsistent")]
    CardinalityViolation,
}
