use super::VariableError;

/// The result of [`Propagator::infer`](crate::propagation::Propagator::infer): either the
/// propagator is done for now (sleeping or entailed) or it failed.
pub type PropagationStatus = Result<PropagatorState, Inconsistency>;

/// The state a propagator ends in after a successful inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagatorState {
    /// The propagator narrowed what it could and waits for one of its variables to change.
    Sleeping,
    /// The relation holds for every assignment within the current bounds.
    Entailed,
}

impl PropagatorState {
    pub fn from_entailment(is_entailed: bool) -> PropagatorState {
        if is_entailed {
            PropagatorState::Entailed
        } else {
            PropagatorState::Sleeping
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A mutation would have violated a variable invariant.
    Variable(VariableError),
    /// The propagator detected that its relation cannot hold.
    Conflict,
}

impl From<VariableError> for Inconsistency {
    fn from(error: VariableError) -> Self {
        Inconsistency::Variable(error)
    }
}
