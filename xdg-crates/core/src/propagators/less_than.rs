use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::containers::IntSet;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::IntVar;
use crate::engine::Space;

/// `left <= right` over two integer variables.
#[derive(Clone, Debug)]
pub struct LessThan {
    left: IntVar,
    right: IntVar,
}

impl LessThan {
    pub fn new(left: IntVar, right: IntVar) -> Self {
        LessThan { left, right }
    }
}

impl Propagator for LessThan {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::LessThan
    }

    fn scope(&self) -> Scope {
        Scope::new().int(self.left).int(self.right)
    }

    fn fails(&self, space: &Space) -> bool {
        space.int_min(self.left) > space.int_max(self.right)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space.int_max(self.left) <= space.int_min(self.right)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let max_right = context.int_max(self.right);
        let _ = context.strengthen(self.left, &IntSet::range(0, max_right + 1))?;
        let min_left = context.int_min(self.left);
        let _ = context.discard_values(self.right, &IntSet::range(0, min_left))?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::LessThan;
    use crate::engine::test_model::TestModel;

    #[test]
    fn windows_are_narrowed_from_both_sides() {
        let mut model = TestModel::default();
        let x = model.new_int_variable([2, 4, 6, 8]);
        let y = model.new_int_variable([1, 3, 5]);
        let _ = model
            .new_propagator(LessThan::new(x, y))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(x, [2, 4]);
        space.assert_domain(y, [3, 5]);
    }

    #[test]
    fn equal_values_are_allowed() {
        let mut model = TestModel::default();
        let x = model.new_int_variable([3]);
        let y = model.new_int_variable([3]);
        let id = model
            .new_propagator(LessThan::new(x, y))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_consistent();
        space.assert_entailed(id);
    }

    #[test]
    fn disjoint_windows_fail() {
        let mut model = TestModel::default();
        let x = model.new_int_variable([5, 6]);
        let y = model.new_int_variable([1, 4]);
        let _ = model
            .new_propagator(LessThan::new(x, y))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
