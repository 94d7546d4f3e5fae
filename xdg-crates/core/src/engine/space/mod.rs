//! Computation spaces: the bounds of every variable at one node of the search tree.
mod frame;
mod space_options;

use std::fmt::Display;
use std::rc::Rc;

use log::debug;
pub use space_options::SpaceOptions;

use self::frame::Frame;
use crate::basic_types::PropagatorState;
use crate::basic_types::VariableError;
use crate::branching::Choice;
use crate::containers::IntSet;
use crate::containers::KeyedVec;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorQueue;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::IntVar;
use crate::engine::variables::SetBounds;
use crate::engine::variables::SetVar;
use crate::engine::variables::VarRef;
use crate::engine::Model;
use crate::propagators::BasicConstraint;
use crate::xdg_assert_advanced;
use crate::xdg_assert_moderate;
use crate::xdg_assert_simple;

/// The outcome of [`Space::propagate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceStatus {
    /// Every core variable is determined.
    Succeeded,
    /// Propagation reached a fixed point but some core variable is undetermined.
    Distributable,
    /// The accumulated penalty exceeds the maximum.
    Failed,
}

/// Where a propagator is in its life cycle within one space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagatorStatus {
    Active,
    Entailed,
    Failed,
}

/// Counts of the propagator invocations performed in one space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationCounts {
    pub num_propagations: u64,
    pub num_failures: u64,
    pub num_tolerated_failures: u64,
}

/// A node of the search tree.
///
/// A space stores only the bounds it changed relative to its parent; unchanged bounds are read
/// through the chain of frozen parent frames and finally from the [`Model`]. Distribution consumes
/// the space and freezes its frame, so no space is ever mutated once it has children.
#[derive(Debug)]
pub struct Space {
    model: Rc<Model>,
    options: SpaceOptions,
    name: String,
    frame: Frame,
    propagators: KeyedVec<PropagatorId, PropagatorStatus>,
    queue: PropagatorQueue,
    penalty: f64,
    status: Option<SpaceStatus>,
    counts: PropagationCounts,
}

impl Space {
    /// The root space of `model`; all propagators start awake.
    pub fn root(model: Rc<Model>, options: SpaceOptions) -> Space {
        let propagators = model
            .propagator_ids()
            .map(|_| PropagatorStatus::Active)
            .collect();
        let mut queue = PropagatorQueue::default();
        model.propagator_ids().for_each(|id| queue.enqueue(id));

        let status = if model.inconsistent_variables().is_empty() {
            None
        } else {
            debug!(
                "root space fails on inconsistent variables {:?}",
                model.inconsistent_variables()
            );
            Some(SpaceStatus::Failed)
        };

        Space {
            model,
            options,
            name: "root".to_owned(),
            frame: Frame {
                chain_length: 1,
                ..Frame::default()
            },
            propagators,
            queue,
            penalty: 0.0,
            status,
            counts: PropagationCounts::default(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn options(&self) -> &SpaceOptions {
        &self.options
    }

    /// A path-like name (`root.0.1`) used in traces.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The status computed by the last call to [`Space::propagate`], if any.
    pub fn status(&self) -> Option<SpaceStatus> {
        self.status
    }

    pub fn is_failed(&self) -> bool {
        self.status == Some(SpaceStatus::Failed)
    }

    pub fn counts(&self) -> PropagationCounts {
        self.counts
    }

    pub fn propagator_status(&self, propagator: PropagatorId) -> PropagatorStatus {
        self.propagators[propagator]
    }

    pub fn int_domain(&self, var: IntVar) -> &IntSet {
        self.frame
            .int_domain(var)
            .unwrap_or_else(|| self.model.initial_domain(var))
    }

    pub fn set_bounds(&self, var: SetVar) -> &SetBounds {
        self.frame
            .set_bounds(var)
            .unwrap_or_else(|| self.model.initial_bounds(var))
    }

    /// The core variables that are not yet determined, in the order they were made core.
    pub fn undetermined_core(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.model
            .core_variables()
            .iter()
            .copied()
            .filter(|&var| !self.is_determined(var))
    }

    pub fn num_undetermined_core(&self) -> usize {
        self.undetermined_core().count()
    }

    pub(crate) fn update_int(
        &mut self,
        var: IntVar,
        update: impl FnOnce(&mut IntSet) -> Result<bool, VariableError>,
    ) -> Result<bool, VariableError> {
        // Work on a copy so that a failed update leaves the stored bounds untouched.
        let mut domain = self.int_domain(var).clone();
        let changed = update(&mut domain)?;
        if changed {
            xdg_assert_advanced!(domain.is_subset(self.model.initial_domain(var)));
            let _ = self.frame.ints.insert(var, domain);
        }
        Ok(changed)
    }

    pub(crate) fn update_set(
        &mut self,
        var: SetVar,
        update: impl FnOnce(&mut SetBounds) -> Result<bool, VariableError>,
    ) -> Result<bool, VariableError> {
        let mut bounds = self.set_bounds(var).clone();
        let changed = update(&mut bounds)?;
        if changed {
            xdg_assert_advanced!(bounds
                .upper()
                .is_subset(self.model.initial_bounds(var).upper()));
            let _ = self.frame.sets.insert(var, bounds);
        }
        Ok(changed)
    }

    /// Run the awake propagators until none is left or the space fails.
    ///
    /// Propagators are run in passes: the propagators woken during a pass run in the next one. A
    /// failing propagator adds its weight to the penalty of the space and is not run again; only
    /// when the penalty exceeds [`SpaceOptions::max_penalty`] does the space fail.
    pub fn propagate(&mut self) -> SpaceStatus {
        if self.is_failed() {
            return SpaceStatus::Failed;
        }

        let model = Rc::clone(&self.model);
        while let Some(propagator_id) = self.queue.pop() {
            if self.propagators[propagator_id] != PropagatorStatus::Active {
                continue;
            }
            if !self.run_propagator(&model, propagator_id) {
                self.queue.clear();
                self.status = Some(SpaceStatus::Failed);
                return SpaceStatus::Failed;
            }
        }
        xdg_assert_moderate!(self.queue.is_empty());

        let status = if self.undetermined_core().next().is_none() {
            SpaceStatus::Succeeded
        } else {
            SpaceStatus::Distributable
        };
        self.status = Some(status);
        status
    }

    /// A single call to [`Propagator::infer`](crate::propagation::Propagator::infer), waking the
    /// propagators of every variable it changed. Returns false when the space fails.
    fn run_propagator(&mut self, model: &Model, propagator_id: PropagatorId) -> bool {
        let propagator = model.propagator(propagator_id);
        let kind = propagator.kind();
        let trace = self.options.trace.contains(kind);

        let mut context = PropagationContext::new(self, Some(propagator_id), Some(kind), trace);
        let result = propagator.infer(&mut context);
        let changed = context.into_changed();
        self.counts.num_propagations += 1;

        match result {
            Ok(PropagatorState::Sleeping) => {}
            Ok(PropagatorState::Entailed) => {
                self.propagators[propagator_id] = PropagatorStatus::Entailed;
            }
            Err(inconsistency) => {
                let tag = model.propagator_tag(propagator_id);
                self.propagators[propagator_id] = PropagatorStatus::Failed;
                self.counts.num_failures += 1;
                if tag.weight > 0.0 {
                    self.penalty += tag.weight;
                }
                debug!(
                    "{}: {} [{}] failed ({inconsistency:?}), penalty {:.2}",
                    self.name,
                    propagator.name(),
                    tag.origin(),
                    self.penalty
                );
                if self.penalty > self.options.max_penalty {
                    return false;
                }
                self.counts.num_tolerated_failures += 1;
            }
        }

        for var in changed {
            self.wake(model, var);
        }
        true
    }

    fn wake(&mut self, model: &Model, var: VarRef) {
        for &propagator_id in model.propagators_of(var) {
            if self.propagators[propagator_id] == PropagatorStatus::Active {
                self.queue.enqueue(propagator_id);
            }
        }
    }

    /// Split the space on `choice`: the first child adds the positive constraint, the second the
    /// negative one. Children whose constraint contradicts the bounds start out failed.
    pub fn distribute(self, choice: &Choice) -> [Space; 2] {
        xdg_assert_simple!(
            self.status == Some(SpaceStatus::Distributable),
            "only distributable spaces can be distributed"
        );
        let Space {
            model,
            options,
            name,
            frame,
            propagators,
            penalty,
            ..
        } = self;
        let frame = frame.freeze();

        let spawn = |branch: usize, constraint: &BasicConstraint| {
            let mut child = Space {
                model: Rc::clone(&model),
                options,
                name: format!("{name}.{branch}"),
                frame: Frame::child_of(&frame),
                propagators: propagators.clone(),
                queue: PropagatorQueue::default(),
                penalty,
                status: None,
                counts: PropagationCounts::default(),
            };
            child.apply(choice.variable, constraint);
            child
        };

        [spawn(0, &choice.positive), spawn(1, &choice.negative)]
    }

    fn apply(&mut self, variable: VarRef, constraint: &BasicConstraint) {
        let model = Rc::clone(&self.model);
        let trace = !self.options.trace.is_empty();

        let mut context = PropagationContext::new(self, None, None, trace);
        let result = constraint.apply(&mut context);
        let changed = context.into_changed();

        match result {
            Ok(_) => {
                self.wake(&model, variable);
                for var in changed {
                    self.wake(&model, var);
                }
            }
            Err(error) => {
                debug!("{}: distribution on {constraint} failed: {error}", self.name);
                self.status = Some(SpaceStatus::Failed);
            }
        }
    }
}

impl Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "space {} (penalty {:.2})", self.name, self.penalty)?;
        for var in self.model.int_vars() {
            writeln!(f, "  {} = {}", self.model.int_name(var), self.int_domain(var))?;
        }
        for var in self.model.set_vars() {
            writeln!(f, "  {} = {}", self.model.set_name(var), self.set_bounds(var))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Space;
    use super::SpaceOptions;
    use super::SpaceStatus;
    use crate::branching::Choice;
    use crate::containers::IntSet;
    use crate::engine::propagation::ReadDomains;
    use crate::engine::Model;
    use crate::propagators::BasicConstraint;
    use crate::propagators::LessThan;

    #[test]
    fn children_see_parent_bounds_and_diverge() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::range(0, 3));
        let y = model.new_int_var("y", IntSet::range(0, 3));
        model.make_core(x);
        model.make_core(y);
        model
            .add_constraint(LessThan::new(x, y))
            .post()
            .expect("valid constraint");

        let mut root = Space::root(Rc::new(model), SpaceOptions::default());
        assert_eq!(root.propagate(), SpaceStatus::Distributable);

        let choice = Choice {
            variable: x.into(),
            positive: BasicConstraint::Member(x, IntSet::singleton(2)),
            negative: BasicConstraint::Member(x, IntSet::from([0, 1])),
        };
        let [mut left, mut right] = root.distribute(&choice);
        assert_eq!(left.name(), "root.0");

        assert_eq!(left.propagate(), SpaceStatus::Succeeded);
        assert_eq!(left.int_value(y), Some(2));
        assert_eq!(right.propagate(), SpaceStatus::Distributable);
        assert_eq!(right.domain(x), &IntSet::from([0, 1]));
        assert_eq!(right.domain(y), &IntSet::range(0, 3));
    }

    #[test]
    fn lenient_failures_accumulate_penalty() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::from([3]));
        let y = model.new_int_var("y", IntSet::from([1]));
        model
            .add_constraint(LessThan::new(x, y))
            .weight(0.5)
            .post()
            .expect("valid constraint");
        model
            .add_constraint(BasicConstraint::Member(x, IntSet::singleton(0)))
            .weight(0.0)
            .post()
            .expect("valid constraint");

        let mut space = Space::root(Rc::new(model), SpaceOptions::default());
        assert_eq!(space.propagate(), SpaceStatus::Succeeded);
        assert_eq!(space.penalty(), 0.5);
        assert_eq!(space.counts().num_tolerated_failures, 2);
    }

    #[test]
    fn zero_max_penalty_tolerates_no_weighted_failure() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::from([3]));
        let y = model.new_int_var("y", IntSet::from([1]));
        model
            .add_constraint(LessThan::new(x, y))
            .weight(0.1)
            .post()
            .expect("valid constraint");

        let options = SpaceOptions {
            max_penalty: 0.0,
            ..SpaceOptions::default()
        };
        let mut space = Space::root(Rc::new(model), options);
        assert_eq!(space.propagate(), SpaceStatus::Failed);
    }

    #[test]
    fn inconsistent_initial_bounds_fail_the_root() {
        let mut model = Model::default();
        let _ = model.new_set_var_with_cardinality("s", IntSet::new(), IntSet::from([1]), 2, 2);
        let mut space = Space::root(Rc::new(model), SpaceOptions::default());
        assert_eq!(space.propagate(), SpaceStatus::Failed);
    }

    #[test]
    fn propagating_twice_reaches_the_same_fixed_point() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::range(0, 5));
        let y = model.new_int_var("y", IntSet::range(2, 4));
        model.make_core(x);
        model
            .add_constraint(LessThan::new(y, x))
            .post()
            .expect("valid constraint");

        let mut space = Space::root(Rc::new(model), SpaceOptions::default());
        let first = space.propagate();
        let domain = space.domain(x).clone();
        assert_eq!(space.propagate(), first);
        assert_eq!(space.domain(x), &domain);
        assert_eq!(domain, IntSet::range(2, 5));
    }
}
