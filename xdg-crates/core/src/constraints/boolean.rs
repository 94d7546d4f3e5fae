use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::containers::IntSet;
use crate::engine::propagation::PropagatorTag;
use crate::engine::variables::BoolView;
use crate::engine::variables::IntVar;
use crate::engine::Model;
use crate::propagators::BasicConstraint;
use crate::propagators::IntIntSelection;
use crate::propagators::LogEquivalence;
use crate::propagators::LogImplication;

/// Creates the [`Constraint`] `negated = 1 - operand` over 0/1 variables.
///
/// Encoded as the element constraint `negated = [1, 0][operand]`.
pub fn negation(negated: IntVar, operand: IntVar) -> impl Constraint {
    Negation { negated, operand }
}

/// Creates the [`Constraint`] `a ⇔ b` over truth values.
pub fn equivalence(a: impl Into<BoolView>, b: impl Into<BoolView>) -> impl Constraint {
    LogEquivalence::new(a, b)
}

/// Creates the [`Constraint`] `a ⇒ b` over truth values.
pub fn implication(a: impl Into<BoolView>, b: impl Into<BoolView>) -> impl Constraint {
    LogImplication::new(a, b)
}

#[derive(Debug)]
struct Negation {
    negated: IntVar,
    operand: IntVar,
}

impl Constraint for Negation {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let one = model.int_constant(1);
        let zero = model.int_constant(0);
        BasicConstraint::Member(self.operand, IntSet::from([0, 1])).post(model, tag)?;
        IntIntSelection::new(self.negated, self.operand, vec![one, zero]).post(model, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::implication;
    use super::negation;
    use crate::engine::test_model::TestModel;

    #[test]
    fn negation_of_false_is_true() {
        let mut model = TestModel::default();
        let b = model.new_int_variable([0]);
        let nb = model.new_int_variable([0, 1]);
        model.post(negation(nb, b));

        model.propagate().assert_domain(nb, [1]);
    }

    #[test]
    fn negation_works_backwards() {
        let mut model = TestModel::default();
        let b = model.new_int_variable([0, 1]);
        let nb = model.new_int_variable([0]);
        model.post(negation(nb, b));

        model.propagate().assert_domain(b, [1]);
    }

    #[test]
    fn implication_over_sets_and_integers() {
        let mut model = TestModel::default();
        let active = model.new_set_variable([2], 0..4);
        let holds = model.new_int_variable([0, 1]);
        model.post(implication(active, holds));

        model.propagate().assert_domain(holds, [1]);
    }
}
