#![cfg(test)]
//! Helpers for testing propagators: set up variables, post the propagators under test and run the
//! root space to a fixed point.
use std::rc::Rc;

use super::propagation::PropagatorId;
use super::propagation::PropagatorTag;
use super::propagation::ReadDomains;
use super::variables::IntVar;
use super::variables::SetVar;
use super::Model;
use super::Space;
use super::SpaceOptions;
use super::SpaceStatus;
use crate::basic_types::ConstraintOperationError;
use crate::constraints::Constraint;
use crate::containers::IntSet;
use crate::engine::propagation::Propagator;
use crate::engine::PropagatorStatus;

#[derive(Debug, Default)]
pub(crate) struct TestModel {
    pub(crate) model: Model,
}

impl TestModel {
    pub(crate) fn new_int_variable(&mut self, values: impl IntoIterator<Item = u32>) -> IntVar {
        let name = format!("i{}", self.model.num_int_vars());
        self.model.new_int_var(name, values.into_iter().collect())
    }

    pub(crate) fn new_set_variable(
        &mut self,
        lower: impl IntoIterator<Item = u32>,
        upper: impl IntoIterator<Item = u32>,
    ) -> SetVar {
        let name = format!("s{}", self.model.num_set_vars());
        self.model
            .new_set_var(name, lower.into_iter().collect(), upper.into_iter().collect())
    }

    pub(crate) fn new_set_variable_with_cardinality(
        &mut self,
        lower: impl IntoIterator<Item = u32>,
        upper: impl IntoIterator<Item = u32>,
        lcard: u32,
        ucard: u32,
    ) -> SetVar {
        let name = format!("s{}", self.model.num_set_vars());
        self.model.new_set_var_with_cardinality(
            name,
            lower.into_iter().collect(),
            upper.into_iter().collect(),
            lcard,
            ucard,
        )
    }

    pub(crate) fn set_constant(&mut self, values: impl IntoIterator<Item = u32>) -> SetVar {
        self.model.set_constant(values.into_iter().collect())
    }

    pub(crate) fn int_constant(&mut self, value: u32) -> IntVar {
        self.model.int_constant(value)
    }

    pub(crate) fn new_propagator<P: Propagator>(
        &mut self,
        propagator: P,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        self.model
            .add_propagator(Box::new(propagator), PropagatorTag::default())
    }

    pub(crate) fn post(&mut self, constraint: impl Constraint) {
        self.model
            .add_constraint(constraint)
            .post()
            .expect("constraint is well-formed");
    }

    /// Freeze the model and propagate its root space.
    pub(crate) fn propagate(self) -> TestSpace {
        let mut space = Space::root(Rc::new(self.model), SpaceOptions::default());
        let status = space.propagate();
        TestSpace { space, status }
    }
}

#[derive(Debug)]
pub(crate) struct TestSpace {
    pub(crate) space: Space,
    pub(crate) status: SpaceStatus,
}

impl ReadDomains for TestSpace {
    fn space(&self) -> &Space {
        &self.space
    }
}

impl TestSpace {
    pub(crate) fn assert_failed(&self) {
        assert_eq!(self.status, SpaceStatus::Failed, "expected a failed space");
    }

    pub(crate) fn assert_consistent(&self) {
        assert_ne!(self.status, SpaceStatus::Failed, "expected a consistent space");
    }

    pub(crate) fn assert_domain(&self, var: IntVar, values: impl IntoIterator<Item = u32>) {
        let expected: IntSet = values.into_iter().collect();
        assert_eq!(self.domain(var), &expected, "domain of {var}");
    }

    pub(crate) fn assert_lower(&self, var: SetVar, values: impl IntoIterator<Item = u32>) {
        let expected: IntSet = values.into_iter().collect();
        assert_eq!(self.lower(var), &expected, "lower bound of {var}");
    }

    pub(crate) fn assert_upper(&self, var: SetVar, values: impl IntoIterator<Item = u32>) {
        let expected: IntSet = values.into_iter().collect();
        assert_eq!(self.upper(var), &expected, "upper bound of {var}");
    }

    pub(crate) fn assert_cardinality(&self, var: SetVar, lcard: u32, ucard: u32) {
        assert_eq!(
            (self.lcard(var), self.ucard(var)),
            (lcard, ucard),
            "cardinality of {var}"
        );
    }

    pub(crate) fn assert_entailed(&self, propagator: PropagatorId) {
        assert_eq!(
            self.space.propagator_status(propagator),
            PropagatorStatus::Entailed
        );
    }
}
