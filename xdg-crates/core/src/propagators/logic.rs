use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::BoolView;
use crate::engine::Space;

/// `a ⇔ b` over truth values: integers are true when non-zero, sets when non-empty.
#[derive(Clone, Debug)]
pub struct LogEquivalence {
    a: BoolView,
    b: BoolView,
}

impl LogEquivalence {
    pub fn new(a: impl Into<BoolView>, b: impl Into<BoolView>) -> Self {
        LogEquivalence {
            a: a.into(),
            b: b.into(),
        }
    }
}

impl Propagator for LogEquivalence {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::LogEquivalence
    }

    fn scope(&self) -> Scope {
        Scope::new().var(self.a).var(self.b)
    }

    fn fails(&self, space: &Space) -> bool {
        matches!((space.truth(self.a), space.truth(self.b)), (Some(a), Some(b)) if a != b)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        matches!((space.truth(self.a), space.truth(self.b)), (Some(a), Some(b)) if a == b)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        for (from, to) in [(self.a, self.b), (self.b, self.a)] {
            if let Some(value) = context.truth(from) {
                let _ = context.assign_truth(to, value)?;
            }
        }
        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

/// `a ⇒ b` over truth values.
#[derive(Clone, Debug)]
pub struct LogImplication {
    a: BoolView,
    b: BoolView,
}

impl LogImplication {
    pub fn new(a: impl Into<BoolView>, b: impl Into<BoolView>) -> Self {
        LogImplication {
            a: a.into(),
            b: b.into(),
        }
    }
}

impl Propagator for LogImplication {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::LogImplication
    }

    fn scope(&self) -> Scope {
        Scope::new().var(self.a).var(self.b)
    }

    fn fails(&self, space: &Space) -> bool {
        space.truth(self.a) == Some(true) && space.truth(self.b) == Some(false)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space.truth(self.a) == Some(false) || space.truth(self.b) == Some(true)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        if context.truth(self.a) == Some(true) {
            let _ = context.assign_truth(self.b, true)?;
        }
        if context.truth(self.b) == Some(false) {
            let _ = context.assign_truth(self.a, false)?;
        }
        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::LogEquivalence;
    use super::LogImplication;
    use crate::engine::test_model::TestModel;

    #[test]
    fn a_non_empty_set_makes_the_integer_true() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([3], 0..5);
        let t = model.new_int_variable([0, 1]);
        let id = model
            .new_propagator(LogEquivalence::new(s, t))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(t, [1]);
        space.assert_entailed(id);
    }

    #[test]
    fn a_false_integer_empties_the_set() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([], 0..5);
        let t = model.new_int_variable([0]);
        let _ = model
            .new_propagator(LogEquivalence::new(s, t))
            .expect("valid propagator");

        model.propagate().assert_upper(s, []);
    }

    #[test]
    fn implication_propagates_forwards_and_backwards() {
        let mut model = TestModel::default();
        let a = model.new_int_variable([1]);
        let b = model.new_set_variable([], 0..3);
        let c = model.new_set_variable([], 0..3);
        let d = model.new_int_variable([0]);
        let _ = model
            .new_propagator(LogImplication::new(a, b))
            .expect("valid propagator");
        let _ = model
            .new_propagator(LogImplication::new(c, d))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_cardinality(b, 1, 3);
        space.assert_upper(c, []);
    }

    #[test]
    fn true_premise_with_false_conclusion_fails() {
        let mut model = TestModel::default();
        let a = model.new_int_variable([2]);
        let b = model.set_constant([]);
        let _ = model
            .new_propagator(LogImplication::new(a, b))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
