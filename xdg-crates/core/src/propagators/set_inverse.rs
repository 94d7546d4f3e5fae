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

/// `i ∈ outs[j] ⇔ j ∈ ins[i]`: channels the daughters of every node to the mothers of every node.
#[derive(Clone, Debug)]
pub struct SetInverse {
    outs: Vec<SetVar>,
    ins: Vec<SetVar>,
}

impl SetInverse {
    pub fn new(outs: Vec<SetVar>, ins: Vec<SetVar>) -> Self {
        SetInverse { outs, ins }
    }

    /// Whether some `i ∈ bound(from[j])` has `j ∉ other(to[i])`.
    fn mismatched<'a>(
        from: &[SetVar],
        to: &[SetVar],
        bound: impl Fn(SetVar) -> &'a IntSet,
        other: impl Fn(SetVar) -> &'a IntSet,
    ) -> bool {
        from.iter().enumerate().any(|(j, &var)| {
            bound(var)
                .iter()
                .any(|i| !to.get(i as usize).is_some_and(|&to| other(to).contains(j as u32)))
        })
    }
}

impl Propagator for SetInverse {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SetInverse
    }

    fn scope(&self) -> Scope {
        Scope::new()
            .sets(self.outs.iter().copied())
            .sets(self.ins.iter().copied())
    }

    fn fails(&self, space: &Space) -> bool {
        SetInverse::mismatched(&self.outs, &self.ins, |v| space.lower(v), |v| space.upper(v))
            || SetInverse::mismatched(&self.ins, &self.outs, |v| space.lower(v), |v| space.upper(v))
    }

    fn is_entailed(&self, space: &Space) -> bool {
        self.outs
            .iter()
            .chain(&self.ins)
            .all(|&var| space.is_set_determined(var))
    }

    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if self.fails(context.space()) {
            return Err(Inconsistency::Conflict);
        }

        for (from, to) in [(&self.outs, &self.ins), (&self.ins, &self.outs)] {
            let range = IntSet::range(0, to.len() as u32);
            for (j, &var) in from.iter().enumerate() {
                let _ = context.strengthen_upper(var, &range)?;

                let lower = context.lower(var).clone();
                for i in &lower {
                    let _ = context.include_value(to[i as usize], j as u32)?;
                }
                let excluded: IntSet = range
                    .iter()
                    .filter(|&i| !context.upper(to[i as usize]).contains(j as u32))
                    .collect();
                let _ = context.discard_upper(var, &excluded)?;
            }
        }

        Ok(PropagatorState::from_entailment(
            self.is_entailed(context.space()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::SetInverse;
    use crate::engine::test_model::TestModel;

    #[test]
    fn daughters_and_mothers_are_channelled() {
        let mut model = TestModel::default();
        let outs = vec![
            model.new_set_variable([1], 0..3),
            model.new_set_variable([], 0..3),
            model.new_set_variable([], 0..3),
        ];
        let ins = vec![
            model.new_set_variable([], [1]),
            model.new_set_variable([], 0..3),
            model.new_set_variable([2], 0..3),
        ];
        let _ = model
            .new_propagator(SetInverse::new(outs.clone(), ins.clone()))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_lower(ins[1], [0]);
        space.assert_lower(outs[2], [2]);
        space.assert_upper(outs[0], [1, 2]);
        space.assert_upper(outs[2], [1, 2]);
    }

    #[test]
    fn upper_bounds_are_cut_to_the_node_range() {
        let mut model = TestModel::default();
        let outs = vec![model.new_set_variable([], 0..8)];
        let ins = vec![model.new_set_variable([], 0..8)];
        let _ = model
            .new_propagator(SetInverse::new(outs.clone(), ins.clone()))
            .expect("valid propagator");

        let space = model.propagate();
        space.assert_upper(outs[0], [0]);
        space.assert_upper(ins[0], [0]);
    }

    #[test]
    fn required_arc_without_counterpart_fails() {
        let mut model = TestModel::default();
        let outs = vec![model.new_set_variable([1], 0..2), model.new_set_variable([], 0..2)];
        let ins = vec![model.new_set_variable([], 0..2), model.new_set_variable([], [1])];
        let _ = model
            .new_propagator(SetInverse::new(outs, ins))
            .expect("valid propagator");

        model.propagate().assert_failed();
    }
}
