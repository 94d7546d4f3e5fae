use log::trace;

use super::ConstraintKind;
use super::PropagatorId;
use crate::basic_types::VariableError;
use crate::containers::IntSet;
use crate::engine::variables::BoolView;
use crate::engine::variables::IntVar;
use crate::engine::variables::SetBounds;
use crate::engine::variables::SetVar;
use crate::engine::variables::VarRef;
use crate::engine::Space;

/// Read access to the bounds of the variables in a space.
pub trait ReadDomains {
    fn space(&self) -> &Space;

    fn domain(&self, var: IntVar) -> &IntSet {
        self.space().int_domain(var)
    }

    fn bounds(&self, var: SetVar) -> &SetBounds {
        self.space().set_bounds(var)
    }

    fn lower(&self, var: SetVar) -> &IntSet {
        self.bounds(var).lower()
    }

    fn upper(&self, var: SetVar) -> &IntSet {
        self.bounds(var).upper()
    }

    fn lcard(&self, var: SetVar) -> u32 {
        self.bounds(var).lcard()
    }

    fn ucard(&self, var: SetVar) -> u32 {
        self.bounds(var).ucard()
    }

    /// The smallest value of `var`. Domains of live variables are never empty.
    fn int_min(&self, var: IntVar) -> u32 {
        self.domain(var).min().unwrap_or(0)
    }

    fn int_max(&self, var: IntVar) -> u32 {
        self.domain(var).max().unwrap_or(0)
    }

    fn int_value(&self, var: IntVar) -> Option<u32> {
        self.domain(var).single()
    }

    fn set_value(&self, var: SetVar) -> Option<&IntSet> {
        self.bounds(var).value()
    }

    fn is_int_determined(&self, var: IntVar) -> bool {
        self.domain(var).len() == 1
    }

    fn is_set_determined(&self, var: SetVar) -> bool {
        self.bounds(var).is_determined()
    }

    fn is_determined(&self, var: VarRef) -> bool {
        match var {
            VarRef::Int(var) => self.is_int_determined(var),
            VarRef::Set(var) => self.is_set_determined(var),
        }
    }

    /// The truth value of `view` if the bounds already decide it.
    fn truth(&self, view: BoolView) -> Option<bool> {
        match view {
            BoolView::Int(var) => {
                let domain = self.domain(var);
                if !domain.contains(0) {
                    Some(true)
                } else if domain.len() == 1 {
                    Some(false)
                } else {
                    None
                }
            }
            BoolView::Set(var) => {
                if self.lcard(var) >= 1 {
                    Some(true)
                } else if self.ucard(var) == 0 {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }
}

impl ReadDomains for Space {
    fn space(&self) -> &Space {
        self
    }
}

/// The view a propagator gets of a space during [`Propagator::infer`](super::Propagator::infer).
///
/// Every mutation is attributed to the running propagator: the changed variable is recorded so
/// that the propagators depending on it are woken, and, when tracing is enabled for this kind of
/// propagator, the new bounds are logged.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    space: &'a mut Space,
    propagator: Option<PropagatorId>,
    kind: Option<ConstraintKind>,
    trace: bool,
    changed: Vec<VarRef>,
}

impl ReadDomains for PropagationContext<'_> {
    fn space(&self) -> &Space {
        self.space
    }
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        space: &'a mut Space,
        propagator: Option<PropagatorId>,
        kind: Option<ConstraintKind>,
        trace: bool,
    ) -> PropagationContext<'a> {
        PropagationContext {
            space,
            propagator,
            kind,
            trace,
            changed: Vec::new(),
        }
    }

    pub(crate) fn into_changed(self) -> Vec<VarRef> {
        self.changed
    }

    /// Intersect the domain of `var` with `values`.
    pub fn strengthen(&mut self, var: IntVar, values: &IntSet) -> Result<bool, VariableError> {
        let changed = self.space.update_int(var, |domain| {
            if domain.is_subset(values) {
                return Ok(false);
            }
            domain.intersect_with(values);
            if domain.is_empty() {
                Err(VariableError::EmptyDomain)
            } else {
                Ok(true)
            }
        })?;
        self.record(VarRef::Int(var), changed);
        Ok(changed)
    }

    pub fn determine(&mut self, var: IntVar, value: u32) -> Result<bool, VariableError> {
        self.strengthen(var, &IntSet::singleton(value))
    }

    pub fn discard_value(&mut self, var: IntVar, value: u32) -> Result<bool, VariableError> {
        self.discard_values(var, &IntSet::singleton(value))
    }

    pub fn discard_values(&mut self, var: IntVar, values: &IntSet) -> Result<bool, VariableError> {
        let changed = self.space.update_int(var, |domain| {
            if domain.is_disjoint(values) {
                return Ok(false);
            }
            domain.difference_with(values);
            if domain.is_empty() {
                Err(VariableError::EmptyDomain)
            } else {
                Ok(true)
            }
        })?;
        self.record(VarRef::Int(var), changed);
        Ok(changed)
    }

    /// Add `values` to the lower bound of `var`.
    pub fn strengthen_lower(&mut self, var: SetVar, values: &IntSet) -> Result<bool, VariableError> {
        if values.is_subset(self.lower(var)) {
            return Ok(false);
        }
        self.update_set(var, |bounds| bounds.strengthen_lower(values))
    }

    pub fn include_value(&mut self, var: SetVar, value: u32) -> Result<bool, VariableError> {
        self.strengthen_lower(var, &IntSet::singleton(value))
    }

    /// Intersect the upper bound of `var` with `values`.
    pub fn strengthen_upper(&mut self, var: SetVar, values: &IntSet) -> Result<bool, VariableError> {
        if self.upper(var).is_subset(values) {
            return Ok(false);
        }
        self.update_set(var, |bounds| bounds.strengthen_upper(values))
    }

    /// Remove `values` from the upper bound of `var`.
    pub fn discard_upper(&mut self, var: SetVar, values: &IntSet) -> Result<bool, VariableError> {
        if self.upper(var).is_disjoint(values) {
            return Ok(false);
        }
        self.update_set(var, |bounds| bounds.discard_upper(values))
    }

    pub fn discard_upper_value(&mut self, var: SetVar, value: u32) -> Result<bool, VariableError> {
        self.discard_upper(var, &IntSet::singleton(value))
    }

    pub fn strengthen_lower_card(&mut self, var: SetVar, lcard: u32) -> Result<bool, VariableError> {
        if lcard <= self.lcard(var) {
            return Ok(false);
        }
        self.update_set(var, |bounds| bounds.strengthen_lower_card(lcard))
    }

    pub fn strengthen_upper_card(&mut self, var: SetVar, ucard: u32) -> Result<bool, VariableError> {
        if ucard >= self.ucard(var) {
            return Ok(false);
        }
        self.update_set(var, |bounds| bounds.strengthen_upper_card(ucard))
    }

    pub fn determine_set(&mut self, var: SetVar, value: &IntSet) -> Result<bool, VariableError> {
        self.update_set(var, |bounds| bounds.determine(value))
    }

    /// Make `view` true (non-zero, non-empty) or false (zero, empty).
    pub fn assign_truth(&mut self, view: BoolView, value: bool) -> Result<bool, VariableError> {
        match (view, value) {
            (BoolView::Int(var), true) => self.discard_value(var, 0),
            (BoolView::Int(var), false) => self.determine(var, 0),
            (BoolView::Set(var), true) => self.strengthen_lower_card(var, 1),
            (BoolView::Set(var), false) => self.strengthen_upper_card(var, 0),
        }
    }

    fn update_set(
        &mut self,
        var: SetVar,
        update: impl FnOnce(&mut SetBounds) -> Result<bool, VariableError>,
    ) -> Result<bool, VariableError> {
        let changed = self.space.update_set(var, update)?;
        self.record(VarRef::Set(var), changed);
        Ok(changed)
    }

    fn record(&mut self, var: VarRef, changed: bool) {
        if !changed {
            return;
        }
        self.changed.push(var);

        if self.trace {
            let model = self.space.model();
            let culprit = match (self.propagator, self.kind) {
                (Some(propagator), Some(kind)) => {
                    format!("{kind} [{}]", model.propagator_tag(propagator).origin())
                }
                _ => "distribution".to_owned(),
            };
            match var {
                VarRef::Int(int_var) => trace!(
                    "{}: {} <- {} by {culprit}",
                    self.space.name(),
                    model.int_name(int_var),
                    self.space.int_domain(int_var),
                ),
                VarRef::Set(set_var) => trace!(
                    "{}: {} <- {} by {culprit}",
                    self.space.name(),
                    model.set_name(set_var),
                    self.space.set_bounds(set_var),
                ),
            }
        }
    }
}
