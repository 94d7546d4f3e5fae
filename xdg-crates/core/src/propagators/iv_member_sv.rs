use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::IntVar;
use crate::engine::variables::SetVar;
use crate::engine::Space;

/// `value(int) ∈ value(set)`.
#[derive(Clone, Debug)]
pub struct IvMemberSv {
    int: IntVar,
    set: SetVar,
}

impl IvMemberSv {
    pub fn new(int: IntVar, set: SetVar) -> Self {
        IvMemberSv { int, set }
    }
}

impl Propagator for IvMemberSv {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IvMemberSv
    }

    fn scope(&self) -> Scope {
        Scope::new().int(self.int).set(self.set)
    }

    fn fails(&self, space: &Space) -> bool {
        space.domain(self.int).is_disjoint(space.upper(self.set))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space.domain(self.int).is_subset(space.lower(self.set))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let upper = context.upper(self.set).clone();
        let _ = context.strengthen(self.int, &upper)?;
        if let Some(value) = context.int_value(self.int) {
            let _ = context.include_value(self.set, value)?;
        }
        let _ = context.strengthen_lower_card(self.set, 1)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::IvMemberSv;
    use crate::engine::test_model::TestModel;

    #[test]
    fn domain_is_restricted_to_the_upper_bound() {
        let mut model = TestModel::default();
        let x = model.new_int_variable(0..6);
        let s = model.new_set_variable([], [1, 3, 8]);
        let _ = model
            .new_propagator(IvMemberSv::new(x, s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(x, [1, 3]);
        space.assert_cardinality(s, 1, 3);
    }

    #[test]
    fn determined_value_enters_the_set() {
        let mut model = TestModel::default();
        let x = model.new_int_variable([2, 9]);
        let s = model.new_set_variable([], 0..4);
        let id = model
            .new_propagator(IvMemberSv::new(x, s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(x, [2]);
        space.assert_lower(s, [2]);
        space.assert_entailed(id);
    }

    #[test]
    fn disjoint_candidates_fail() {
        let mut model = TestModel::default();
        let x = model.new_int_variable([5, 6]);
        let s = model.new_set_variable([], 0..4);
        let _ = model
            .new_propagator(IvMemberSv::new(x, s))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
