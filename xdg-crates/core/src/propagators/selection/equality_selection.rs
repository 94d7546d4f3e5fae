use std::rc::Rc;

use super::check_selector_bound;
use super::selectable;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PairCodec;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::containers::HashMap;
use crate::containers::IntSet;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::IntVar;
use crate::engine::variables::SetVar;
use crate::engine::Model;
use crate::engine::Space;

/// A value map: `map[v]` are the values a sequence variable may hold when the main variable is
/// `v`. Values past the end of the map admit nothing.
pub type ValueMap = Rc<[IntSet]>;

/// For every pair `(m, s)` in `sel`, encoded as `m * seqs.len() + s`, the values of `seqs[s]` are
/// admitted by `mains[m]`: they all equal it or, when the pair has a value map, they are all in
/// `map[mains[m]]`.
///
/// In agreement a sequence variable collects the feature values of a node's daughters on one
/// label, so an empty sequence (no daughters) makes a selected pair hold trivially.
#[derive(Clone, Debug)]
pub struct EqualitySelection {
    mains: Vec<IntVar>,
    sel: SetVar,
    seqs: Vec<SetVar>,
    maps: HashMap<u32, ValueMap>,
}

impl EqualitySelection {
    pub fn new(mains: Vec<IntVar>, sel: SetVar, seqs: Vec<SetVar>) -> Self {
        EqualitySelection {
            mains,
            sel,
            seqs,
            maps: HashMap::default(),
        }
    }

    /// Use `map` instead of equality for the pair `(main, seq)`.
    pub fn with_map(mut self, main: u32, seq: u32, map: ValueMap) -> Self {
        let code = self.codec().encode(main, seq);
        let _ = self.maps.insert(code, map);
        self
    }

    pub fn codec(&self) -> PairCodec {
        PairCodec::new(self.seqs.len().max(1) as u32)
    }

    fn bound(&self) -> u32 {
        (self.mains.len() * self.seqs.len()) as u32
    }

    fn pairs(&self, codes: &IntSet) -> Vec<(u32, IntVar, SetVar)> {
        let codec = self.codec();
        codes
            .iter()
            .filter_map(|code| {
                let (main, seq) = codec.decode(code);
                Some((
                    code,
                    *self.mains.get(main as usize)?,
                    *self.seqs.get(seq as usize)?,
                ))
            })
            .collect()
    }

    /// The values a sequence may hold when its main variable is `value`.
    fn admitted(&self, code: u32, value: u32) -> IntSet {
        match self.maps.get(&code) {
            Some(map) => map.get(value as usize).cloned().unwrap_or_default(),
            None => IntSet::singleton(value),
        }
    }

    /// The values of `main` that admit every required element of `seq`.
    fn supported(&self, space: &impl ReadDomains, code: u32, main: IntVar, seq: SetVar) -> IntSet {
        let lower = space.lower(seq);
        space
            .domain(main)
            .iter()
            .filter(|&value| lower.is_subset(&self.admitted(code, value)))
            .collect()
    }
}

impl Propagator for EqualitySelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::EqualitySelection
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .ints(self.mains.iter().copied())
            .set(self.sel)
            .sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        self.pairs(space.lower(self.sel))
            .into_iter()
            .any(|(code, main, seq)| self.supported(space, code, main, seq).is_empty())
    }

    fn is_entailed(&self, space: &Space) -> bool {
        self.pairs(space.upper(self.sel))
            .into_iter()
            .all(|(code, main, seq)| {
                space
                    .domain(main)
                    .iter()
                    .all(|value| space.upper(seq).is_subset(&self.admitted(code, value)))
            })
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let unsupported: IntSet = self
            .pairs(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(code, main, seq)| self.supported(context.space(), code, main, seq).is_empty())
            .map(|(code, _, _)| code)
            .collect();
        let _ = context.discard_upper(self.sel, &unsupported)?;

        for (code, main, seq) in self.pairs(context.lower(self.sel)) {
            let supported = self.supported(context.space(), code, main, seq);
            let _ = context.strengthen(main, &supported)?;

            let mut admitted = IntSet::new();
            for value in context.domain(main) {
                admitted.union_with(&self.admitted(code, value));
            }
            let _ = context.strengthen_upper(seq, &admitted)?;
            if !self.maps.contains_key(&code) {
                let _ = context.strengthen_upper_card(seq, 1)?;
            }
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::EqualitySelection;
    use crate::containers::IntSet;
    use crate::engine::test_model::TestModel;

    #[test]
    fn daughters_take_the_value_of_the_mother() {
        let mut model = TestModel::default();
        let agr = model.new_int_variable([1, 2, 3]);
        let sel = model.set_constant([0]);
        let daughters = model.new_set_variable([], 0..5);
        let _ = model
            .new_propagator(EqualitySelection::new(vec![agr], sel, vec![daughters]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(daughters, [1, 2, 3]);
        space.assert_cardinality(daughters, 0, 1);
    }

    #[test]
    fn a_required_daughter_value_fixes_the_mother() {
        let mut model = TestModel::default();
        let agr = model.new_int_variable([1, 2, 3]);
        let sel = model.set_constant([0]);
        let daughters = model.new_set_variable([2], 0..5);
        let id = model
            .new_propagator(EqualitySelection::new(vec![agr], sel, vec![daughters]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(agr, [2]);
        space.assert_upper(daughters, [2]);
        space.assert_entailed(id);
    }

    #[test]
    fn without_daughters_the_pair_is_vacuous() {
        let mut model = TestModel::default();
        let agr = model.new_int_variable([1, 2, 3]);
        let sel = model.set_constant([0]);
        let daughters = model.set_constant([]);
        let id = model
            .new_propagator(EqualitySelection::new(vec![agr], sel, vec![daughters]))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(agr, [1, 2, 3]);
        space.assert_entailed(id);
    }

    #[test]
    fn mapped_values_are_admitted() {
        let mut model = TestModel::default();
        let source = model.new_int_variable([0, 1]);
        let sel = model.new_set_variable([0], [0, 1]);
        let s0 = model.new_set_variable([3], 0..6);
        let s1 = model.new_set_variable([5], [5]);
        let map = Rc::from(vec![IntSet::from([2, 3]), IntSet::from([4])]);
        let propagator =
            EqualitySelection::new(vec![source], sel, vec![s0, s1]).with_map(0, 0, map);
        let _ = model.new_propagator(propagator).expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(source, [0]);
        space.assert_upper(s0, [2, 3]);
        space.assert_upper(sel, [0]);
    }

    #[test]
    fn conflicting_required_values_fail() {
        let mut model = TestModel::default();
        let agr = model.new_int_variable([1, 2, 3]);
        let sel = model.set_constant([0]);
        let daughters = model.new_set_variable([1, 2], 0..5);
        let _ = model
            .new_propagator(EqualitySelection::new(vec![agr], sel, vec![daughters]))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
