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
use crate::engine::variables::SetVar;
use crate::engine::Model;
use crate::engine::Space;
use crate::propagators::set_precedence::enforce_precedence;
use crate::propagators::set_precedence::precedence_entailed;
use crate::propagators::set_precedence::precedence_fails;

/// `seqs[i] << seqs[j]` for all `i < j` in `sel`: the selected sequence variables keep their index
/// order.
#[derive(Clone, Debug)]
pub struct SimplePrecedenceSelection {
    sel: SetVar,
    seqs: Vec<SetVar>,
}

impl SimplePrecedenceSelection {
    pub fn new(sel: SetVar, seqs: Vec<SetVar>) -> Self {
        SimplePrecedenceSelection { sel, seqs }
    }

    fn bound(&self) -> u32 {
        self.seqs.len() as u32
    }

    fn selected(&self, indices: &IntSet) -> Vec<(u32, SetVar)> {
        indices
            .iter()
            .filter_map(|index| Some((index, *self.seqs.get(index as usize)?)))
            .collect()
    }

    /// Every ordered pair `(seqs[i], seqs[j])` with `i < j` among `indices`.
    fn ordered_pairs(&self, indices: &IntSet) -> Vec<(SetVar, SetVar)> {
        let selected = self.selected(indices);
        selected
            .iter()
            .enumerate()
            .flat_map(|(position, &(_, first))| {
                selected[position + 1..]
                    .iter()
                    .map(move |&(_, second)| (first, second))
            })
            .collect()
    }

    /// Whether adding `index` to the required selection would violate the order.
    fn conflicts(&self, space: &impl ReadDomains, index: u32, seq: SetVar) -> bool {
        self.selected(space.lower(self.sel))
            .into_iter()
            .any(|(other_index, other)| match other_index.cmp(&index) {
                std::cmp::Ordering::Less => precedence_fails(space, other, seq),
                std::cmp::Ordering::Greater => precedence_fails(space, seq, other),
                std::cmp::Ordering::Equal => false,
            })
    }
}

impl Propagator for SimplePrecedenceSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SimplePrecedenceSelection
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.sel).sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        self.ordered_pairs(space.lower(self.sel))
            .into_iter()
            .any(|(s1, s2)| precedence_fails(space, s1, s2))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        self.ordered_pairs(space.upper(self.sel))
            .into_iter()
            .all(|(s1, s2)| precedence_entailed(space, s1, s2))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let excluded: IntSet = self
            .selected(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(index, seq)| self.conflicts(context.space(), index, seq))
            .map(|(index, _)| index)
            .collect();
        let _ = context.discard_upper(self.sel, &excluded)?;

        for (s1, s2) in self.ordered_pairs(context.lower(self.sel)) {
            enforce_precedence(context, s1, s2)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
