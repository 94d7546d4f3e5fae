use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::SetVar;
use crate::engine::Space;

/// `s1 ⊇ s2 ∩ s3`. With a constant empty `s1` this is the disjointness of `s2` and `s3`.
#[derive(Clone, Debug)]
pub struct SupersetIntersection {
    s1: SetVar,
    s2: SetVar,
    s3: SetVar,
}

impl SupersetIntersection {
    pub fn new(s1: SetVar, s2: SetVar, s3: SetVar) -> Self {
        SupersetIntersection { s1, s2, s3 }
    }

    /// A lower bound on `|s2 ∩ s3|`.
    fn min_intersection(&self, space: &impl ReadDomains) -> u32 {
        let covered = space.upper(self.s2).union(space.upper(self.s3)).len() as u32;
        (space.lcard(self.s2) + space.lcard(self.s3)).saturating_sub(covered)
    }
}

impl Propagator for SupersetIntersection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SupersetIntersection
    }

    fn scope(&self) -> Scope {
        Scope::new().sets([self.s1, self.s2, self.s3])
    }

    fn fails(&self, space: &Space) -> bool {
        !space
            .lower(self.s2)
            .intersection(space.lower(self.s3))
            .is_subset(space.upper(self.s1))
            || self.min_intersection(space) > space.ucard(self.s1)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space
            .upper(self.s2)
            .intersection(space.upper(self.s3))
            .is_subset(space.lower(self.s1))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let both = context.lower(self.s2).intersection(context.lower(self.s3));
        let _ = context.strengthen_lower(self.s1, &both)?;

        let outside = context.lower(self.s3).difference(context.upper(self.s1));
        let _ = context.discard_upper(self.s2, &outside)?;
        let outside = context.lower(self.s2).difference(context.upper(self.s1));
        let _ = context.discard_upper(self.s3, &outside)?;

        let min_intersection = self.min_intersection(context.space());
        let _ = context.strengthen_lower_card(self.s1, min_intersection)?;

        // An element of s2 is either in s1 or outside of s3.
        let ucard1 = context.ucard(self.s1);
        for (s2, s3) in [(self.s2, self.s3), (self.s3, self.s2)] {
            let free = context.upper(s2).difference(context.lower(s3)).len() as u32;
            let _ = context.strengthen_upper_card(s2, ucard1 + free)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::SupersetIntersection;
    use crate::engine::test_model::TestModel;

    #[test]
    fn common_elements_enter_the_superset() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable([], 0..6);
        let s2 = model.new_set_variable([1, 2], 0..6);
        let s3 = model.new_set_variable([2, 3], 0..6);
        let _ = model
            .new_propagator(SupersetIntersection::new(s1, s2, s3))
            .expect("valid propagator");

        model.propagate().assert_lower(s1, [2]);
    }

    #[test]
    fn empty_superset_makes_sets_disjoint() {
        let mut model = TestModel::default();
        let empty = model.set_constant([]);
        let s2 = model.new_set_variable([1], 0..4);
        let s3 = model.new_set_variable([2], 0..4);
        let _ = model
            .new_propagator(SupersetIntersection::new(empty, s2, s3))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_consistent();
        space.assert_upper(s2, [0, 1, 3]);
        space.assert_upper(s3, [0, 2, 3]);
    }

    #[test]
    fn overlapping_cardinalities_force_an_intersection() {
        let mut model = TestModel::default();
        let s1 = model.new_set_variable([], 0..3);
        let s2 = model.new_set_variable_with_cardinality([], 0..3, 2, 3);
        let s3 = model.new_set_variable_with_cardinality([], 0..3, 2, 3);
        let _ = model
            .new_propagator(SupersetIntersection::new(s1, s2, s3))
            .expect("valid propagator");

        model.propagate().assert_cardinality(s1, 1, 3);
    }

    #[test]
    fn shared_required_element_outside_superset_fails() {
        let mut model = TestModel::default();
        let empty = model.set_constant([]);
        let s2 = model.new_set_variable([1], 0..4);
        let s3 = model.new_set_variable([1], 0..4);
        let _ = model
            .new_propagator(SupersetIntersection::new(empty, s2, s3))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
