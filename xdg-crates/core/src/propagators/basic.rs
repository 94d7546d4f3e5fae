use std::fmt::Display;

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
use crate::engine::variables::IntVar;
use crate::engine::variables::SetVar;
use crate::engine::variables::VarRef;
use crate::engine::Space;

/// A unary constraint that is enforced by a single bound update.
///
/// Basic constraints are what distribution adds to the children of a space; they can also be
/// posted as ordinary propagators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BasicConstraint {
    /// The value of the integer variable lies in the set.
    Member(IntVar, IntSet),
    /// The value of the set variable is a subset of the set.
    Subset(SetVar, IntSet),
    /// The value of the set variable is a superset of the set.
    Superset(SetVar, IntSet),
    CardinalityGeq(SetVar, u32),
    CardinalityLeq(SetVar, u32),
}

impl BasicConstraint {
    pub fn variable(&self) -> VarRef {
        match self {
            BasicConstraint::Member(var, _) => VarRef::Int(*var),
            BasicConstraint::Subset(var, _)
            | BasicConstraint::Superset(var, _)
            | BasicConstraint::CardinalityGeq(var, _)
            | BasicConstraint::CardinalityLeq(var, _) => VarRef::Set(*var),
        }
    }

    /// Update the bounds of the variable so that the constraint holds.
    pub fn apply(&self, context: &mut PropagationContext<'_>) -> Result<bool, VariableError> {
        match self {
            BasicConstraint::Member(var, values) => context.strengthen(*var, values),
            BasicConstraint::Subset(var, values) => context.strengthen_upper(*var, values),
            BasicConstraint::Superset(var, values) => context.strengthen_lower(*var, values),
            BasicConstraint::CardinalityGeq(var, lcard) => {
                context.strengthen_lower_card(*var, *lcard)
            }
            BasicConstraint::CardinalityLeq(var, ucard) => {
                context.strengthen_upper_card(*var, *ucard)
            }
        }
    }
}

impl Propagator for BasicConstraint {
    fn kind(&self) -> ConstraintKind {
        match self {
            BasicConstraint::Member(..) => ConstraintKind::Member,
            BasicConstraint::Subset(..) => ConstraintKind::Subset,
            BasicConstraint::Superset(..) => ConstraintKind::Superset,
            BasicConstraint::CardinalityGeq(..) => ConstraintKind::CardinalityGeq,
            BasicConstraint::CardinalityLeq(..) => ConstraintKind::CardinalityLeq,
        }
    }

    fn scope(&self) -> Scope {
        Scope::new().var(self.variable())
    }

    fn fails(&self, space: &Space) -> bool {
        match self {
            BasicConstraint::Member(var, values) => space.domain(*var).is_disjoint(values),
            BasicConstraint::Subset(var, values) => {
                !space.lower(*var).is_subset(values)
                    || space.lcard(*var) as usize > space.upper(*var).intersection(values).len()
            }
            BasicConstraint::Superset(var, values) => {
                !values.is_subset(space.upper(*var))
                    || (space.ucard(*var) as usize) < space.lower(*var).union(values).len()
            }
            BasicConstraint::CardinalityGeq(var, lcard) => space.ucard(*var) < *lcard,
            BasicConstraint::CardinalityLeq(var, ucard) => space.lcard(*var) > *ucard,
        }
    }

    fn is_entailed(&self, space: &Space) -> bool {
        match self {
            BasicConstraint::Member(var, values) => space.domain(*var).is_subset(values),
            BasicConstraint::Subset(var, values) => space.upper(*var).is_subset(values),
            BasicConstraint::Superset(var, values) => values.is_subset(space.lower(*var)),
            BasicConstraint::CardinalityGeq(var, lcard) => space.lcard(*var) >= *lcard,
            BasicConstraint::CardinalityLeq(var, ucard) => space.ucard(*var) <= *ucard,
        }
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        let _ = self.apply(context)?;
        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

impl Display for BasicConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicConstraint::Member(var, values) => write!(f, "{var} in {values}"),
            BasicConstraint::Subset(var, values) => write!(f, "{var} <= {values}"),
            BasicConstraint::Superset(var, values) => write!(f, "{var} >= {values}"),
            BasicConstraint::CardinalityGeq(var, lcard) => write!(f, "|{var}| >= {lcard}"),
            BasicConstraint::CardinalityLeq(var, ucard) => write!(f, "|{var}| <= {ucard}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BasicConstraint;
    use crate::containers::IntSet;
    use crate::engine::test_model::TestModel;

    #[test]
    fn member_intersects_the_domain() {
        let mut model = TestModel::default();
        let x = model.new_int_variable(0..5);
        let id = model
            .new_propagator(BasicConstraint::Member(x, IntSet::from([1, 3, 7])))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(x, [1, 3]);
        space.assert_entailed(id);
    }

    #[test]
    fn member_fails_without_common_values() {
        let mut model = TestModel::default();
        let x = model.new_int_variable(0..3);
        let _ = model
            .new_propagator(BasicConstraint::Member(x, IntSet::from([5])))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }

    #[test]
    fn subset_can_determine_through_cardinality() {
        let mut model = TestModel::default();
        let s = model.new_set_variable_with_cardinality([], 0..4, 2, 4);
        let _ = model
            .new_propagator(BasicConstraint::Subset(s, IntSet::from([1, 2, 9])))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_lower(s, [1, 2]);
        space.assert_upper(s, [1, 2]);
    }

    #[test]
    fn superset_beyond_upper_cardinality_fails() {
        let mut model = TestModel::default();
        let s = model.new_set_variable_with_cardinality([0], 0..4, 0, 2);
        let _ = model
            .new_propagator(BasicConstraint::Superset(s, IntSet::from([2, 3])))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }

    #[test]
    fn cardinality_bounds_are_tightened() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([], 0..5);
        let _ = model
            .new_propagator(BasicConstraint::CardinalityGeq(s, 1))
            .expect("valid propagator");
        let _ = model
            .new_propagator(BasicConstraint::CardinalityLeq(s, 3))
            .expect("valid propagator");

        model.propagate().assert_cardinality(s, 1, 3);
    }
}
