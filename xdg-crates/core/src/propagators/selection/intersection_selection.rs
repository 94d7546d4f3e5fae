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

/// `main = ⋂ { seqs[i] | i ∈ sel }` with a non-empty selector.
#[derive(Clone, Debug)]
pub struct IntersectionSelection {
    main: SetVar,
    sel: SetVar,
    seqs: Vec<SetVar>,
}

impl IntersectionSelection {
    pub fn new(main: SetVar, sel: SetVar, seqs: Vec<SetVar>) -> Self {
        IntersectionSelection { main, sel, seqs }
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

    /// The intersection of `bound(seq)` over the sequence variables at `indices`, or `None` when
    /// `indices` selects nothing.
    fn intersection_of<'a>(
        &self,
        indices: &IntSet,
        bound: impl Fn(SetVar) -> &'a IntSet,
    ) -> Option<IntSet> {
        let mut selected = self.selected(indices).into_iter();
        let (_, first) = selected.next()?;
        let mut intersection = bound(first).clone();
        for (_, seq) in selected {
            intersection.intersect_with(bound(seq));
        }
        Some(intersection)
    }
}

impl Propagator for IntersectionSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IntersectionSelection
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .set(self.main)
            .set(self.sel)
            .sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        if model.initial_bounds(self.sel).upper().is_empty() {
            return Err(ConstraintOperationError::EmptyIntersectionSelector(
                model.set_name(self.main).to_owned(),
            ));
        }
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        let lower_main = space.lower(self.main);
        space.ucard(self.sel) == 0
            || self
                .selected(space.lower(self.sel))
                .into_iter()
                .any(|(_, seq)| !lower_main.is_subset(space.upper(seq)))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        let Some(sel) = space.set_value(self.sel) else {
            return false;
        };
        let (Some(upper), Some(lower)) = (
            self.intersection_of(sel, |seq| space.upper(seq)),
            self.intersection_of(sel, |seq| space.lower(seq)),
        ) else {
            return false;
        };
        upper.is_subset(space.lower(self.main)) && space.upper(self.main).is_subset(&lower)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen_upper(self.sel, &selectable(self.bound()))?;
        let _ = context.strengthen_lower_card(self.sel, 1)?;
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        // A candidate that cannot hold every required element of main cannot be selected.
        let excluded: IntSet = self
            .selected(&context.bounds(self.sel).undecided())
            .into_iter()
            .filter(|&(_, seq)| !context.lower(self.main).is_subset(context.upper(seq)))
            .map(|(index, _)| index)
            .collect();
        let _ = context.discard_upper(self.sel, &excluded)?;

        let space = context.space();
        let upper = self.intersection_of(space.lower(self.sel), |seq| space.upper(seq));
        let lower = self.intersection_of(space.upper(self.sel), |seq| space.lower(seq));
        if let Some(upper) = upper {
            let _ = context.strengthen_upper(self.main, &upper)?;
        }
        if let Some(lower) = lower {
            let _ = context.strengthen_lower(self.main, &lower)?;
        }

        for (_, seq) in self.selected(context.lower(self.sel)) {
            let lower_main = context.lower(self.main).clone();
            let _ = context.strengthen_lower(seq, &lower_main)?;
            let lcard = context.lcard(self.main);
            let _ = context.strengthen_lower_card(seq, lcard)?;
            let ucard = context.ucard(seq);
            let _ = context.strengthen_upper_card(self.main, ucard)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
