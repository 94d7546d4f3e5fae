use super::check_selector_bound;
use super::selectable;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PairCodec;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::containers::IntSet;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::SetVar;
use crate::engine::Model;
use crate::engine::Space;
use crate::propagators::set_precedence::enforce_precedence;
use crate::propagators::set_precedence::precedence_entailed;
use crate::propagators::set_precedence::precedence_fails;

/// `seqs[a] << seqs[b]` for every pair `(a, b)` in `sel`, with pairs encoded as
/// `a * seqs.len() + b`.
///
/// The order principle selects the precedence pairs of a node's lexical entry and applies them
/// to the daughter sets of the node, one per label.
#[derive(Clone, Debug)]
pub struct PrecedenceSelection {
    sel: SetVar,
    seqs: Vec<SetVar>,
}

impl PrecedenceSelection {
    pub fn new(sel: SetVar, seqs: Vec<SetVar>) -> Self {
        PrecedenceSelection { sel, seqs }
    }

    pub fn codec(&self) -> PairCodec {
        PairCodec::new(self.seqs.len().max(1) as u32)
    }

    fn bound(&self) -> u32 {
        (self.seqs.len() * self.seqs.len()) as u32
    }

    /// The sequence variables of every pair in `codes`, with the code.
    fn pairs(&self, codes: &IntSet) -> Vec<(u32, SetVar, SetVar)> {
        let codec = self.codec();
        codes
            .iter()
            .filter_map(|code| {
                let (a, b) = codec.decode(code);
                Some((
                    code,
                    *self.seqs.get(a as usize)?,
                    *self.seqs.get(b as usize)?,
                ))
            })
            .collect()
    }
}

impl Propagator for PrecedenceSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::PrecedenceSelection
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.sel).sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        self.pairs(space.lower(self.sel))
            .into_iter()
            .any(|(_, s1, s2)| precedence_fails(space, s1, s2))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        self.pairs(space.upper(self.sel))
            .into_iter()
            .all(|(_, s1, s2)| precedence_entailed(space, s1, s2))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let violated: IntSet = self
            .pairs(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(_, s1, s2)| precedence_fails(context.space(), s1, s2))
            .map(|(code, _, _)| code)
            .collect();
        let _ = context.discard_upper(self.sel, &violated)?;

        for (_, s1, s2) in self.pairs(context.lower(self.sel)) {
            enforce_precedence(context, s1, s2)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::PrecedenceSelection;
    use crate::basic_types::PairCodec;
    use crate::engine::test_model::TestModel;

    #[test]
    fn selected_pairs_order_the_sequences() {
        let codec = PairCodec::new(3);
        let mut model = TestModel::default();
        let sel = model.set_constant([codec.encode(0, 2)]);
        let s0 = model.new_set_variable([4], 0..10);
        let s1 = model.new_set_variable([], 0..10);
        let s2 = model.new_set_variable([], 0..10);
        let _ = model
            .new_propagator(PrecedenceSelection::new(sel, vec![s0, s1, s2]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s1, 0..10);
        space.assert_upper(s2, 5..10);
    }

    #[test]
    fn violated_pairs_are_deselected() {
        let codec = PairCodec::new(2);
        let mut model = TestModel::default();
        let sel = model.new_set_variable([], [codec.encode(0, 1), codec.encode(1, 0)]);
        let s0 = model.new_set_variable([1], 0..4);
        let s1 = model.new_set_variable([3], 0..4);
        let _ = model
            .new_propagator(PrecedenceSelection::new(sel, vec![s0, s1]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_consistent();
        space.assert_upper(sel, [codec.encode(0, 1)]);
    }

    #[test]
    fn a_selected_violated_pair_fails() {
        let codec = PairCodec::new(2);
        let mut model = TestModel::default();
        let sel = model.set_constant([codec.encode(1, 0)]);
        let s0 = model.new_set_variable([1], 0..4);
        let s1 = model.new_set_variable([3], 0..4);
        let _ = model
            .new_propagator(PrecedenceSelection::new(sel, vec![s0, s1]))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
