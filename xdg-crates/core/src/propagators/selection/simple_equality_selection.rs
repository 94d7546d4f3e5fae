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

/// For every pair `(s, v)` in `sel`, encoded as `s * width + v`, `seqs[s] ⊆ {v}`.
#[derive(Clone, Debug)]
pub struct SimpleEqualitySelection {
    sel: SetVar,
    seqs: Vec<SetVar>,
    codec: PairCodec,
}

impl SimpleEqualitySelection {
    /// `width` is one more than the largest value a pair can name.
    pub fn new(sel: SetVar, seqs: Vec<SetVar>, width: u32) -> Self {
        SimpleEqualitySelection {
            sel,
            seqs,
            codec: PairCodec::new(width),
        }
    }

    fn bound(&self) -> u32 {
        self.seqs.len() as u32 * self.codec.width()
    }

    fn pairs(&self, codes: &IntSet) -> Vec<(u32, SetVar, u32)> {
        codes
            .iter()
            .filter_map(|code| {
                let (seq, value) = self.codec.decode(code);
                Some((code, *self.seqs.get(seq as usize)?, value))
            })
            .collect()
    }
}

impl Propagator for SimpleEqualitySelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SimpleEqualitySelection
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
            .any(|(_, seq, value)| !space.lower(seq).is_subset(&IntSet::singleton(value)))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        self.pairs(space.upper(self.sel))
            .into_iter()
            .all(|(_, seq, value)| space.upper(seq).is_subset(&IntSet::singleton(value)))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let violated: IntSet = self
            .pairs(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(_, seq, value)| !context.lower(seq).is_subset(&IntSet::singleton(value)))
            .map(|(code, _, _)| code)
            .collect();
        let _ = context.discard_upper(self.sel, &violated)?;

        for (_, seq, value) in self.pairs(context.lower(self.sel)) {
            let _ = context.strengthen_upper(seq, &IntSet::singleton(value))?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::SimpleEqualitySelection;
    use crate::basic_types::PairCodec;
    use crate::engine::test_model::TestModel;

    #[test]
    fn governed_daughters_carry_the_value() {
        let codec = PairCodec::new(4);
        let mut model = TestModel::default();
        let sel = model.set_constant([codec.encode(1, 3)]);
        let s0 = model.new_set_variable([], 0..4);
        let s1 = model.new_set_variable([], 0..4);
        let id = model
            .new_propagator(SimpleEqualitySelection::new(sel, vec![s0, s1], 4))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s0, 0..4);
        space.assert_upper(s1, [3]);
        space.assert_entailed(id);
    }

    #[test]
    fn contradicted_pairs_are_deselected() {
        let codec = PairCodec::new(4);
        let mut model = TestModel::default();
        let sel = model.new_set_variable([], [codec.encode(0, 1), codec.encode(0, 2)]);
        let s0 = model.new_set_variable([2], 0..4);
        let _ = model
            .new_propagator(SimpleEqualitySelection::new(sel, vec![s0], 4))
            .expect("valid propagator");

        model.propagate().assert_upper(sel, [codec.encode(0, 2)]);
    }
}
