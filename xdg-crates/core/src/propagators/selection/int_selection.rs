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
use crate::engine::variables::SetVar;
use crate::engine::Model;
use crate::engine::Space;

/// `main = seqs[sel]` for a set variable `main` and an integer selector.
///
/// This is how lexical choice reaches the rest of a problem: `sel` is the entry a node selects and
/// `seqs` holds one (usually determined) set per entry.
#[derive(Clone, Debug)]
pub struct IntSelection {
    main: SetVar,
    sel: IntVar,
    seqs: Vec<SetVar>,
}

impl IntSelection {
    pub fn new(main: SetVar, sel: IntVar, seqs: Vec<SetVar>) -> Self {
        IntSelection { main, sel, seqs }
    }

    fn bound(&self) -> u32 {
        self.seqs.len() as u32
    }

    /// Whether `seq` can still be equal to `main`.
    fn compatible(&self, space: &impl ReadDomains, seq: SetVar) -> bool {
        space.lower(seq).is_subset(space.upper(self.main))
            && space.lower(self.main).is_subset(space.upper(seq))
            && space.lcard(seq).max(space.lcard(self.main))
                <= space.ucard(seq).min(space.ucard(self.main))
    }

    fn candidates(&self, space: &impl ReadDomains) -> Vec<(u32, SetVar)> {
        space
            .domain(self.sel)
            .iter()
            .filter_map(|index| Some((index, *self.seqs.get(index as usize)?)))
            .collect()
    }
}

impl Propagator for IntSelection {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::IntSelection
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .set(self.main)
            .int(self.sel)
            .sets(self.seqs.iter().copied())
    }

    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        check_selector_bound(model, self.sel, self.bound())
    }

    fn fails(&self, space: &Space) -> bool {
        !self
            .candidates(space)
            .into_iter()
            .any(|(_, seq)| self.compatible(space, seq))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        let Some(seq) = space
            .int_value(self.sel)
            .and_then(|index| self.seqs.get(index as usize))
        else {
            return false;
        };
        match (space.set_value(self.main), space.set_value(*seq)) {
            (Some(main), Some(seq)) => main == seq,
            _ => false,
        }
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let _ = context.strengthen(self.sel, &selectable(self.bound()))?;

        let incompatible: IntSet = self
            .candidates(context.space())
            .into_iter()
            .filter(|&(_, seq)| !self.compatible(context.space(), seq))
            .map(|(index, _)| index)
            .collect();
        let _ = context.discard_values(self.sel, &incompatible)?;

        let candidates = self.candidates(context.space());
        let Some(&(_, first)) = candidates.first() else {
            return Err(Inconsistency::Conflict);
        };

        let mut upper = IntSet::new();
        let mut lower = context.lower(first).clone();
        let mut lcard = u32::MAX;
        let mut ucard = 0;
        for &(_, seq) in &candidates {
            upper.union_with(context.upper(seq));
            lower.intersect_with(context.lower(seq));
            lcard = lcard.min(context.lcard(seq));
            ucard = ucard.max(context.ucard(seq));
        }
        let _ = context.strengthen_upper(self.main, &upper)?;
        let _ = context.strengthen_lower(self.main, &lower)?;
        let _ = context.strengthen_lower_card(self.main, lcard)?;
        let _ = context.strengthen_upper_card(self.main, ucard)?;

        if let &[(_, seq)] = candidates.as_slice() {
            let upper = context.upper(self.main).clone();
            let lower = context.lower(self.main).clone();
            let _ = context.strengthen_upper(seq, &upper)?;
            let _ = context.strengthen_lower(seq, &lower)?;
            let (lcard, ucard) = (context.lcard(self.main), context.ucard(self.main));
            let _ = context.strengthen_lower_card(seq, lcard)?;
            let _ = context.strengthen_upper_card(seq, ucard)?;

            let upper = context.upper(seq).clone();
            let lower = context.lower(seq).clone();
            let _ = context.strengthen_upper(self.main, &upper)?;
            let _ = context.strengthen_lower(self.main, &lower)?;
            let (lcard, ucard) = (context.lcard(seq), context.ucard(seq));
            let _ = context.strengthen_lower_card(self.main, lcard)?;
            let _ = context.strengthen_upper_card(self.main, ucard)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
