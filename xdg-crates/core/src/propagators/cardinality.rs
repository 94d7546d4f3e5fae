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
use crate::engine::Space;

/// `|set| = count`.
#[derive(Clone, Debug)]
pub struct CardinalityEq {
    set: SetVar,
    count: IntVar,
}

impl CardinalityEq {
    pub fn new(set: SetVar, count: IntVar) -> Self {
        CardinalityEq { set, count }
    }

    fn admissible_counts(&self, space: &impl ReadDomains) -> IntSet {
        IntSet::range(space.lcard(self.set), space.ucard(self.set) + 1)
    }
}

impl Propagator for CardinalityEq {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::CardinalityEq
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.set).int(self.count)
    }

    fn fails(&self, space: &Space) -> bool {
        space
            .domain(self.count)
            .is_disjoint(&self.admissible_counts(space))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space
            .int_value(self.count)
            .is_some_and(|count| space.lcard(self.set) == count && space.ucard(self.set) == count)
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let counts = self.admissible_counts(context.space());
        let _ = context.strengthen(self.count, &counts)?;

        let min = context.int_min(self.count);
        let max = context.int_max(self.count);
        let _ = context.strengthen_lower_card(self.set, min)?;
        let _ = context.strengthen_upper_card(self.set, max)?;

        // Normalisation of the set bounds may have moved the cardinality again.
        let counts = self.admissible_counts(context.space());
        let _ = context.strengthen(self.count, &counts)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

/// `|set| ∈ counts`: the cardinality of `set` is one of the elements of the set variable `counts`.
#[derive(Clone, Debug)]
pub struct CardinalitySubset {
    set: SetVar,
    counts: SetVar,
}

impl CardinalitySubset {
    pub fn new(set: SetVar, counts: SetVar) -> Self {
        CardinalitySubset { set, counts }
    }

    /// The values of `upper(counts)` that lie within the cardinality bounds of `set`.
    fn candidates(&self, space: &impl ReadDomains) -> IntSet {
        let window = IntSet::range(space.lcard(self.set), space.ucard(self.set) + 1);
        space.upper(self.counts).intersection(&window)
    }
}

impl Propagator for CardinalitySubset {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::CardinalitySubset
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.set).set(self.counts)
    }

    fn fails(&self, space: &Space) -> bool {
        self.candidates(space).is_empty()
    }

    fn is_entailed(&self, space: &Space) -> bool {
        let window = IntSet::range(space.lcard(self.set), space.ucard(self.set) + 1);
        window.is_subset(space.lower(self.counts))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let candidates = self.candidates(context.space());
        let (Some(min), Some(max)) = (candidates.min(), candidates.max()) else {
            return Err(Inconsistency::Conflict);
        };
        let _ = context.strengthen_lower_card(self.set, min)?;
        let _ = context.strengthen_upper_card(self.set, max)?;

        let lcard = context.lcard(self.set);
        if lcard == context.ucard(self.set) {
            let _ = context.include_value(self.counts, lcard)?;
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}
