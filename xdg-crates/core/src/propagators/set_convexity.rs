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
use crate::engine::Space;

/// The value of `set` is an interval of consecutive integers (the empty set included).
#[derive(Clone, Debug)]
pub struct SetConvexity {
    set: SetVar,
}

impl SetConvexity {
    pub fn new(set: SetVar) -> Self {
        SetConvexity { set }
    }
}

/// The maximal intervals `[start, end]` of consecutive elements of `set`.
fn runs(set: &IntSet) -> Vec<(u32, u32)> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for value in set {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == value => *end = value,
            _ => runs.push((value, value)),
        }
    }
    runs
}

impl Propagator for SetConvexity {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SetConvexity
    }

    fn scope(&self) -> Scope {
        Scope::new().set(self.set)
    }

    fn fails(&self, space: &Space) -> bool {
        let lower = space.lower(self.set);
        match (lower.min(), lower.max()) {
            (Some(min), Some(max)) => {
                !IntSet::range(min, max + 1).is_subset(space.upper(self.set))
                    || max - min + 1 > space.ucard(self.set)
            }
            _ => false,
        }
    }

    fn is_entailed(&self, space: &Space) -> bool {
        space.ucard(self.set) <= 1
            || space
                .set_value(self.set)
                .is_some_and(|value| value.is_convex())
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        let lower = context.lower(self.set).clone();
        if let (Some(min), Some(max)) = (lower.min(), lower.max()) {
            let _ = context.strengthen_lower(self.set, &IntSet::range(min, max + 1))?;

            // Only the run of the upper bound around the lower bound remains, and no element
            // further away from the lower bound than the cardinality allows.
            let upper = context.upper(self.set);
            let (start, end) = runs(upper)
                .into_iter()
                .find(|&(start, end)| start <= min && max <= end)
                .ok_or(Inconsistency::Conflict)?;
            let ucard = context.ucard(self.set);
            let start = start.max((max + 1).saturating_sub(ucard));
            let end = end.min(min + ucard - 1);
            let _ = context.strengthen_upper(self.set, &IntSet::range(start, end + 1))?;
        } else {
            let lcard = context.lcard(self.set);
            if lcard > 1 {
                let short: IntSet = runs(context.upper(self.set))
                    .into_iter()
                    .filter(|&(start, end)| end - start + 1 < lcard)
                    .flat_map(|(start, end)| start..=end)
                    .collect();
                let _ = context.discard_upper(self.set, &short)?;
            }
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::runs;
    use super::SetConvexity;
    use crate::containers::IntSet;
    use crate::engine::test_model::TestModel;

    #[test]
    fn runs_are_maximal() {
        assert_eq!(runs(&IntSet::from([1, 2, 3, 5, 7, 8])), vec![(1, 3), (5, 5), (7, 8)]);
        assert!(runs(&IntSet::new()).is_empty());
    }

    #[test]
    fn gaps_in_lower_are_filled() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([2, 5], 0..10);
        let _ = model
            .new_propagator(SetConvexity::new(s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_lower(s, [2, 3, 4, 5]);
    }

    #[test]
    fn upper_keeps_only_the_run_around_lower() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([3], [0, 1, 3, 4, 5, 7, 8]);
        let _ = model
            .new_propagator(SetConvexity::new(s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s, [3, 4, 5]);
    }

    #[test]
    fn upper_is_limited_by_cardinality() {
        let mut model = TestModel::default();
        let s = model.new_set_variable_with_cardinality([4], 0..10, 0, 2);
        let _ = model
            .new_propagator(SetConvexity::new(s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s, [3, 4, 5]);
    }

    #[test]
    fn short_runs_are_dropped_when_lower_is_empty() {
        let mut model = TestModel::default();
        let s = model.new_set_variable_with_cardinality([], [0, 2, 3, 4, 6, 7], 3, 6);
        let _ = model
            .new_propagator(SetConvexity::new(s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_lower(s, [2, 3, 4]);
        space.assert_upper(s, [2, 3, 4]);
    }

    #[test]
    fn holes_inside_lower_span_fail() {
        let mut model = TestModel::default();
        let s = model.new_set_variable([1, 4], [1, 2, 4]);
        let _ = model
            .new_propagator(SetConvexity::new(s))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
