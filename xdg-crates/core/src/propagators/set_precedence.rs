use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::basic_types::VariableError;
use crate::containers::IntSet;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::SetVar;
use crate::engine::Space;

/// `s1 << s2`: every element of `s1` is smaller than every element of `s2`.
#[derive(Clone, Debug)]
pub struct SetPrecedence {
    s1: SetVar,
    s2: SetVar,
}

impl SetPrecedence {
    pub fn new(s1: SetVar, s2: SetVar) -> Self {
        SetPrecedence { s1, s2 }
    }
}

/// Whether `s1 << s2` is violated by the required elements alone.
pub(crate) fn precedence_fails(space: &impl ReadDomains, s1: SetVar, s2: SetVar) -> bool {
    match (space.lower(s1).max(), space.lower(s2).min()) {
        (Some(max1), Some(min2)) => max1 >= min2,
        _ => false,
    }
}

/// Whether `s1 << s2` holds for every value within the bounds.
pub(crate) fn precedence_entailed(space: &impl ReadDomains, s1: SetVar, s2: SetVar) -> bool {
    match (space.upper(s1).max(), space.upper(s2).min()) {
        (Some(max1), Some(min2)) => max1 < min2,
        _ => true,
    }
}

/// Narrow the upper bounds of `s1` and `s2` so that `s1 << s2` can still hold.
pub(crate) fn enforce_precedence(
    context: &mut PropagationContext<'_>,
    s1: SetVar,
    s2: SetVar,
) -> Result<(), VariableError> {
    // The smallest value s1 certainly reaches, and the largest value s2 certainly starts below.
    let floor = if let Some(max) = context.lower(s1).max() {
        Some(max)
    } else if context.lcard(s1) >= 1 {
        context.upper(s1).min()
    } else {
        None
    };
    if let Some(floor) = floor {
        let _ = context.discard_upper(s2, &IntSet::range(0, floor + 1))?;
    }

    let ceiling = if let Some(min) = context.lower(s2).min() {
        Some(min)
    } else if context.lcard(s2) >= 1 {
        context.upper(s2).max()
    } else {
        None
    };
    if let (Some(ceiling), Some(max1)) = (ceiling, context.upper(s1).max()) {
        let _ = context.discard_upper(s1, &IntSet::range(ceiling, max1 + 1))?;
    }
    Ok(())
}

impl Propagator for SetPrecedence {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SetPrecedence
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.s1).set(self.s2)
    }

    fn fails(&self, space: &Space) -> bool {
        precedence_fails(space, self.s1, self.s2)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        precedence_entailed(space, self.s1, self.s2)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        enforce_precedence(context, self.s1, self.s2)?;
        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::SetPrecedence;
    use crate::engine::test_model::TestModel;

    #[test]
    fn required_elements_cut_the_other_upper_bound() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable([3], 0..8);
        let s2 = model.new_set_variable([5], 0..8);
        let _ = model
            .new_propagator(SetPrecedence::new(s1, s2))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s1, [0, 1, 2, 3, 4]);
        space.assert_upper(s2, [4, 5, 6, 7]);
    }

    #[test]
    fn nonempty_sets_cut_by_their_extreme_candidates() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable_with_cardinality([], [2, 6], 1, 2);
        let s2 = model.new_set_variable_with_cardinality([], [1, 4, 7], 1, 3);
        let _ = model
            .new_propagator(SetPrecedence::new(s1, s2))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s1, [2, 6]);
        space.assert_upper(s2, [4, 7]);
    }

    #[test]
    fn empty_sets_precede_anything() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable([], [5, 6]);
        let s2 = model.new_set_variable([], [1, 2]);
        let _ = model
            .new_propagator(SetPrecedence::new(s1, s2))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_consistent();
        space.assert_upper(s1, [5, 6]);
        space.assert_upper(s2, [1, 2]);
    }

    #[test]
    fn crossing_required_elements_fail() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable([4], 0..8);
        let s2 = model.new_set_variable([2], 0..8);
        let _ = model
            .new_propagator(SetPrecedence::new(s1, s2))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
