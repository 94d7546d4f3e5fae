use super::check_selector_bound;
use super::selectable;
use crate::basic_types::ConstraintOperationError;
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
use crate::engine::Model;
use crate::engine::Space;

/// `main = seqs[sel]` over integer variables (the element constraint).
#[derive(Clone, Debug)]
pub struct IntIntSelection {
    main: IntVar,
    sel: IntVar,
    seqs: Vec<IntVar>,
}

impl IntIntSelection {
    pub fn new(main: IntVar, sel: IntVar, seqs: Vec<IntVar>) -> Self {
        IntIntSelection { main, sel, seqs }
    }

    fn bound(&self) -> u32 {
        self.seqs.len() as u32
    }

    fn candidates(&self, space: &impl ReadDomains) -> Vec<(u32, IntVar)> {
        space
            .domain(self.sel)
            .iter()
            .filter_map(|index| Some((index, *self.seqs.get(index as usize)?)))
            .collect()
    }
}

impl Propagator for IntIntSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IntIntSelection
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .int(self.main)
            .int(self.sel)
            .ints(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        let main = space.domain(self.main);
        self.candidates(space)
            .into_iter()
            .all(|(_, seq)| space.domain(seq).is_disjoint(main))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        let Some(&seq) = space
            .int_value(self.sel)
            .and_then(|index| self.seqs.get(index as usize))
        else {
            return false;
        };
        space.int_value(self.main).is_some() && space.int_value(self.main) == space.int_value(seq)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let disjoint: IntSet = self
            .candidates(context.space())
            .into_iter()
            .filter(|&(_, seq)| context.domain(seq).is_disjoint(context.domain(self.main)))
            .map(|(index, _)| index)
            .collect();
        let _ = context.discard_values(self.sel, &disjoint)?;

        let candidates = self.candidates(context.space());
        let mut reachable = IntSet::new();
        for &(_, seq) in &candidates {
            reachable.union_with(context.domain(seq));
        }
        let _ = context.strengthen(self.main, &reachable)?;

        if let &[(_, seq)] = candidates.as_slice() {
            let main = context.domain(self.main).clone();
            let _ = context.strengthen(seq, &main)?;
            let values = context.domain(seq).clone();
            let _ = context.strengthen(self.main, &values)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::IntIntSelection;
    use crate::engine::test_model::TestModel;

    #[test]
    fn main_takes_the_values_of_the_candidates() {
        let mut model = TestModel::default();
        let main = model.new_int_variable(0..10);
        let sel = model.new_int_variable([0, 2]);
        let seqs = vec![
            model.new_int_variable([1, 2]),
            model.new_int_variable([5]),
            model.new_int_variable([7]),
        ];
        let _ = model
            .new_propagator(IntIntSelection::new(main, sel, seqs))
            .expect("valid propagator");

        model.propagate().assert_domain(main, [1, 2, 7]);
    }

    #[test]
    fn candidates_without_common_values_are_discarded() {
        let mut model = TestModel::default();
        let main = model.new_int_variable([4, 5]);
        let sel = model.new_int_variable(0..3);
        let s0 = model.new_int_variable([1, 2]);
        let s1 = model.new_int_variable([4, 6]);
        let s2 = model.new_int_variable([7]);
        let id = model
            .new_propagator(IntIntSelection::new(main, sel, vec![s0, s1, s2]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(sel, [1]);
        space.assert_domain(main, [4]);
        space.assert_domain(s1, [4]);
        space.assert_entailed(id);
    }

    #[test]
    fn negation_gadget_flips_a_truth_value() {
        let mut model = TestModel::default();
        let b = model.new_int_variable([1]);
        let nb = model.new_int_variable([0, 1]);
        let one = model.int_constant(1);
        let zero = model.int_constant(0);
        let _ = model
            .new_propagator(IntIntSelection::new(nb, b, vec![one, zero]))
            .expect("valid propagator");

        model.propagate().assert_domain(nb, [0]);
    }
}
