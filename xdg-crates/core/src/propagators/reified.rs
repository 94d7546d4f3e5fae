//! Reified relations: a truth variable `t ∈ {0, 1}` is 1 exactly when a relation holds.
//!
//! Each relation knows when it certainly holds and when it certainly does not; `t` is determined
//! as soon as one of the two is the case. When `t` is 1 the relation is enforced. When `t` is 0
//! only membership propagates its negation, since the negations of inclusion and equality cannot
//! be expressed through bounds.
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

fn truth_values() -> IntSet {
    IntSet::from([0, 1])
}

fn reified_fails(space: &Space, truth: IntVar, decided: Option<bool>) -> bool {
    let domain = space.domain(truth).intersection(&truth_values());
    match decided {
        Some(holds) => !domain.contains(u32::from(holds)),
        None => domain.is_empty(),
    }
}

fn reified_entailed(space: &Space, truth: IntVar, decided: Option<bool>) -> bool {
    decided.is_some_and(|holds| space.int_value(truth) == Some(u32::from(holds)))
}

/// Restrict `truth` to 0 and 1 and determine it when the relation is decided. Returns the value of
/// `truth` if it is known.
fn reify(
    context: &mut PropagationContext<'_>,
    truth: IntVar,
    decided: Option<bool>,
) -> Result<Option<bool>, Inconsistency> {
    let _ = context.strengthen(truth, &truth_values())?;
    if let Some(holds) = decided {
        let _ = context.determine(truth, u32::from(holds))?;
    }
    Ok(context.int_value(truth).map(|value| value == 1))
}

/// `t = 1 ⇔ value(int) ∈ value(set)`.
#[derive(Clone, Debug)]
pub struct ReifiedMembership {
    truth: IntVar,
    int: IntVar,
    set: SetVar,
}

impl ReifiedMembership {
    pub fn new(truth: IntVar, int: IntVar, set: SetVar) -> Self {
        ReifiedMembership { truth, int, set }
    }

    fn decided(&self, space: &impl ReadDomains) -> Option<bool> {
        let domain = space.domain(self.int);
        if domain.is_subset(space.lower(self.set)) {
            Some(true)
        } else if domain.is_disjoint(space.upper(self.set)) {
            Some(false)
        } else {
            None
        }
    }
}

impl Propagator for ReifiedMembership {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::ReifiedMembership
    }

    fn scope(&self) -> Scope {
        Scope::new().int(self.truth).int(self.int).set(self.set)
    }

    fn fails(&self, space: &Space) -> bool {
        reified_fails(space, self.truth, self.decided(space))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        reified_entailed(space, self.truth, self.decided(space))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        let decided = self.decided(context.space());
        match reify(context, self.truth, decided)? {
            Some(true) => {
                let upper = context.upper(self.set).clone();
                let _ = context.strengthen(self.int, &upper)?;
                if let Some(value) = context.int_value(self.int) {
                    let _ = context.include_value(self.set, value)?;
                }
            }
            Some(false) => {
                let lower = context.lower(self.set).clone();
                let _ = context.discard_values(self.int, &lower)?;
                if let Some(value) = context.int_value(self.int) {
                    let _ = context.discard_upper_value(self.set, value)?;
                }
            }
            None => {}
        }
        let decided = self.decided(context.space());
        let _ = reify(context, self.truth, decided)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

/// `t = 1 ⇔ s1 ⊆ s2 ∧ s2 ≠ ∅`.
#[derive(Clone, Debug)]
pub struct ReifiedInclusion {
    truth: IntVar,
    s1: SetVar,
    s2: SetVar,
}

impl ReifiedInclusion {
    pub fn new(truth: IntVar, s1: SetVar, s2: SetVar) -> Self {
        ReifiedInclusion { truth, s1, s2 }
    }

    fn decided(&self, space: &impl ReadDomains) -> Option<bool> {
        if space.upper(self.s1).is_subset(space.lower(self.s2)) && space.lcard(self.s2) >= 1 {
            Some(true)
        } else if !space.lower(self.s1).is_subset(space.upper(self.s2))
            || space.ucard(self.s2) == 0
        {
            Some(false)
        } else {
            None
        }
    }
}

impl Propagator for ReifiedInclusion {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::ReifiedInclusion
    }

    fn scope(&self) -> Scope {
        Scope::new().int(self.truth).set(self.s1).set(self.s2)
    }

    fn fails(&self, space: &Space) -> bool {
        reified_fails(space, self.truth, self.decided(space))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        reified_entailed(space, self.truth, self.decided(space))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        let decided = self.decided(context.space());
        if reify(context, self.truth, decided)? == Some(true) {
            let upper = context.upper(self.s2).clone();
            let _ = context.strengthen_upper(self.s1, &upper)?;
            let lower = context.lower(self.s1).clone();
            let _ = context.strengthen_lower(self.s2, &lower)?;

            let lcard = context.lcard(self.s1).max(1);
            let _ = context.strengthen_lower_card(self.s2, lcard)?;
            let ucard = context.ucard(self.s2);
            let _ = context.strengthen_upper_card(self.s1, ucard)?;
        }
        let decided = self.decided(context.space());
        let _ = reify(context, self.truth, decided)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

/// `t = 1 ⇔ s1 = s2`.
#[derive(Clone, Debug)]
pub struct ReifiedEquality {
    truth: IntVar,
    s1: SetVar,
    s2: SetVar,
}

impl ReifiedEquality {
    pub fn new(truth: IntVar, s1: SetVar, s2: SetVar) -> Self {
        ReifiedEquality { truth, s1, s2 }
    }

    fn decided(&self, space: &impl ReadDomains) -> Option<bool> {
        if let (Some(v1), Some(v2)) = (space.set_value(self.s1), space.set_value(self.s2)) {
            return Some(v1 == v2);
        }
        let separated = !space.lower(self.s1).is_subset(space.upper(self.s2))
            || !space.lower(self.s2).is_subset(space.upper(self.s1))
            || space.lcard(self.s1).max(space.lcard(self.s2))
                > space.ucard(self.s1).min(space.ucard(self.s2));
        separated.then_some(false)
    }
}

impl Propagator for ReifiedEquality {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::ReifiedEquality
    }

    fn scope(&self) -> Scope {
        Scope::new().int(self.truth).set(self.s1).set(self.s2)
    }

    fn fails(&self, space: &Space) -> bool {
        reified_fails(space, self.truth, self.decided(space))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        reified_entailed(space, self.truth, self.decided(space))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }
        let decided = self.decided(context.space());
        if reify(context, self.truth, decided)? == Some(true) {
            for (from, to) in [(self.s1, self.s2), (self.s2, self.s1)] {
                let upper = context.upper(from).clone();
                let _ = context.strengthen_upper(to, &upper)?;
                let lower = context.lower(from).clone();
                let _ = context.strengthen_lower(to, &lower)?;
                let (lcard, ucard) = (context.lcard(from), context.ucard(from));
                let _ = context.strengthen_lower_card(to, lcard)?;
                let _ = context.strengthen_upper_card(to, ucard)?;
            }
        }
        let decided = self.decided(context.space());
        let _ = reify(context, self.truth, decided)?;

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ReifiedEquality;
    use super::ReifiedInclusion;
    use super::ReifiedMembership;
    use crate::engine::test_model::TestModel;

    #[test]
    fn membership_truth_follows_the_bounds() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0, 1]);
        let x = model.new_int_variable([2]);
        let s = model.new_set_variable([2], 0..4);
        let id = model
            .new_propagator(ReifiedMembership::new(t, x, s))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_domain(t, [1]);
        space.assert_entailed(id);
    }

    #[test]
    fn false_membership_excludes_the_value() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0]);
        let x = model.new_int_variable([3]);
        let s = model.new_set_variable([], 0..6);
        let _ = model
            .new_propagator(ReifiedMembership::new(t, x, s))
            .expect("valid propagator");

        model.propagate().assert_upper(s, [0, 1, 2, 4, 5]);
    }

    #[test]
    fn inclusion_is_true_once_the_superset_is_known_to_contain_it() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0, 1]);
        let s1 = model.set_constant([0]);
        let s2 = model.new_set_variable([0], [0, 1]);
        let _ = model
            .new_propagator(ReifiedInclusion::new(t, s1, s2))
            .expect("valid propagator");

        model.propagate().assert_domain(t, [1]);
    }

    #[test]
    fn inclusion_stays_open_while_the_superset_may_miss_it() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0, 1]);
        let s1 = model.set_constant([0]);
        let s2 = model.new_set_variable([], [0, 1]);
        let _ = model
            .new_propagator(ReifiedInclusion::new(t, s1, s2))
            .expect("valid propagator");

        model.propagate().assert_domain(t, [0, 1]);
    }

    #[test]
    fn inclusion_into_an_empty_set_is_false() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0, 1]);
        let s1 = model.set_constant([]);
        let s2 = model.set_constant([]);
        let _ = model
            .new_propagator(ReifiedInclusion::new(t, s1, s2))
            .expect("valid propagator");

        model.propagate().assert_domain(t, [0]);
    }

    #[test]
    fn true_inclusion_is_enforced() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([1]);
        let s1 = model.new_set_variable([1], 0..6);
        let s2 = model.new_set_variable([], [1, 2, 3]);
        let _ = model
            .new_propagator(ReifiedInclusion::new(t, s1, s2))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(s1, [1, 2, 3]);
        space.assert_lower(s2, [1]);
    }

    #[test]
    fn true_equality_unifies_the_bounds() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([1]);
        let s1 = model.new_set_variable([1], [0, 1, 2]);
        let s2 = model.new_set_variable([2], [1, 2, 3]);
        let _ = model
            .new_propagator(ReifiedEquality::new(t, s1, s2))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_lower(s1, [1, 2]);
        space.assert_upper(s2, [1, 2]);
    }

    #[test]
    fn separated_sets_are_not_equal() {
        let mut model = TestModel::default();
        let t = model.new_int_variable([0, 1]);
        let s1 = model.new_set_variable([4], 0..6);
        let s2 = model.new_set_variable([], [1, 2]);
        let _ = model
            .new_propagator(ReifiedEquality::new(t, s1, s2))
            .expect("valid propagator");

        model.propagate().assert_domain(t, [0]);
    }
}
