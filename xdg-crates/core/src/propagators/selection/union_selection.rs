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

/// `main = ⋃ { seqs[i] | i ∈ sel }`.
#[derive(Clone, Debug)]
pub struct UnionSelection {
    main: SetVar,
    sel: SetVar,
    seqs: Vec<SetVar>,
}

impl UnionSelection {
    pub fn new(main: SetVar, sel: SetVar, seqs: Vec<SetVar>) -> Self {
        UnionSelection { main, sel, seqs }
    }

    fn bound(&self) -> u32 {
        self.seqs.len() as u32
    }

    fn union_of<'a>(&self, indices: &IntSet, bound: impl Fn(SetVar) -> &'a IntSet) -> IntSet {
        let mut union = IntSet::new();
        for index in indices {
            if let Some(&seq) = self.seqs.get(index as usize) {
                union.union_with(bound(seq));
            }
        }
        union
    }

    /// The sequence variables at `indices`, with their index.
    fn selected(&self, indices: &IntSet) -> Vec<(u32, SetVar)> {
        indices
            .iter()
            .filter_map(|index| Some((index, *self.seqs.get(index as usize)?)))
            .collect()
    }
}

impl Propagator for UnionSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::UnionSelection
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .set(self.main)
            .set(self.sel)
            .sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        let upper_main = space.upper(self.main);
        let selected_outside = self
            .selected(space.lower(self.sel))
            .into_iter()
            .any(|(_, seq)| !space.lower(seq).is_subset(upper_main));
        let coverable = self.union_of(space.upper(self.sel), |seq| space.upper(seq));
        selected_outside || !space.lower(self.main).is_subset(&coverable)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        let Some(sel) = space.set_value(self.sel) else {
            return false;
        };
        self.union_of(sel, |seq| space.upper(seq))
            .is_subset(space.lower(self.main))
            && space
                .upper(self.main)
                .is_subset(&self.union_of(sel, |seq| space.lower(seq)))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        // A candidate whose required elements do not fit into main cannot be selected.
        let excluded: IntSet = self
            .selected(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(_, seq)| !context.lower(seq).is_subset(context.upper(self.main)))
            .map(|(index, _)| index)
            .collect();
        let _ = context.discard_upper(self.sel, &excluded)?;

        let space = context.space();
        let upper = self.union_of(space.upper(self.sel), |seq| space.upper(seq));
        let lower = self.union_of(space.lower(self.sel), |seq| space.lower(seq));
        let _ = context.strengthen_upper(self.main, &upper)?;
        let _ = context.strengthen_lower(self.main, &lower)?;

        for (_, seq) in self.selected(context.lower(self.sel)) {
            let upper_main = context.upper(self.main).clone();
            let _ = context.strengthen_upper(seq, &upper_main)?;
            let ucard = context.ucard(self.main);
            let _ = context.strengthen_upper_card(seq, ucard)?;
            let lcard = context.lcard(seq);
            let _ = context.strengthen_lower_card(self.main, lcard)?;
        }

        // Every required element of main needs a selectable sequence variable that can hold it;
        // when there is only one, it is selected and made to hold the element.
        let lower_main = context.lower(self.main).clone();
        for value in &lower_main {
            let holders: Vec<(u32, SetVar)> = self
                .selected(context.upper(self.sel))
                .into_iter()
                .filter(|&(_, seq)| context.upper(seq).contains(value))
                .collect();
            match holders.as_slice() {
                [] => return Err(Inconsistency::Conflict),
                &[(index, seq)] => {
                    let _ = context.include_value(self.sel, index)?;
                    let _ = context.include_value(seq, value)?;
                }
                _ => {}
            }
        }

        let ucard: u32 = self
            .selected(context.upper(self.sel))
            .into_iter()
            .map(|(_, seq)| context.ucard(seq))
            .sum();
        let _ = context.strengthen_upper_card(self.main, ucard)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
