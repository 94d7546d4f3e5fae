use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorState;
use crate::engine::propagation::ConstraintKind;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::ReadDomains;
use crate::engine::propagation::Scope;
use crate::engine::variables::SetVar;
use crate::engine::Space;

/// `s1 ⊆ s2 ∪ s3`. With a constant empty `s3` this is the inclusion `s1 ⊆ s2`.
#[derive(Clone, Debug)]
pub struct SubsetUnion {
    s1: SetVar,
    s2: SetVar,
    s3: SetVar,
}

impl SubsetUnion {
    pub fn new(s1: SetVar, s2: SetVar, s3: SetVar) -> Self {
        SubsetUnion { s1, s2, s3 }
    }
}

impl Propagator for SubsetUnion {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SubsetUnion
    }

    fn scope(&self) -> Scope {
        Scope::new().sets([self.s1, self.s2, self.s3])
    }

    fn fails(&self, space: &Space) -> bool {
        !space
            .lower(self.s1)
            .is_subset(&space.upper(self.s2).union(space.upper(self.s3)))
            || space.lcard(self.s1) > space.ucard(self.s2) + space.ucard(self.s3)
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space
            .upper(self.s1)
            .is_subset(&space.lower(self.s2).union(space.lower(self.s3)))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let covered = context.upper(self.s2).union(context.upper(self.s3));
        let _ = context.strengthen_upper(self.s1, &covered)?;

        for (s2, s3) in [(self.s2, self.s3), (self.s3, self.s2)] {
            let forced = context.lower(self.s1).difference(context.upper(s3));
            let _ = context.strengthen_lower(s2, &forced)?;
        }

        let ucard = context.ucard(self.s2) + context.ucard(self.s3);
        let _ = context.strengthen_upper_card(self.s1, ucard)?;
        let lcard1 = context.lcard(self.s1);
        for (s2, s3) in [(self.s2, self.s3), (self.s3, self.s2)] {
            let lcard = lcard1.saturating_sub(context.ucard(s3));
            let _ = context.strengthen_lower_card(s2, lcard)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
