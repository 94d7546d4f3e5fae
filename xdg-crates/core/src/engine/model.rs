use std::rc::Rc;

use log::warn;

use super::propagation::Propagator;
use super::propagation::PropagatorId;
use super::propagation::PropagatorStore;
use super::propagation::PropagatorTag;
use super::variables::IntVar;
use super::variables::SetBounds;
use super::variables::SetVar;
use super::variables::VarRef;
use crate::basic_types::ConstraintOperationError;
use crate::constraints::Constraint;
use crate::containers::HashMap;
use crate::containers::IntSet;
use crate::containers::KeyedVec;

#[derive(Debug)]
struct IntVarInfo {
    name: String,
    initial: IntSet,
    propagators: Vec<PropagatorId>,
    constant: bool,
}

#[derive(Debug)]
struct SetVarInfo {
    name: String,
    initial: SetBounds,
    propagators: Vec<PropagatorId>,
    constant: bool,
}

/// The variables and propagators of one constraint problem.
///
/// A model is built once (variables first, then constraints over them) and then frozen behind an
/// [`Rc`] by [`Space::root`](crate::Space::root); from that point on all variable metadata is
/// immutable and shared by every space of the search.
///
/// Variables are either *core* or *peripheral*. A space succeeds once all core variables are
/// determined; peripheral variables may be left undetermined.
#[derive(Debug, Default)]
pub struct Model {
    ints: KeyedVec<IntVar, IntVarInfo>,
    sets: KeyedVec<SetVar, SetVarInfo>,
    propagators: PropagatorStore,
    int_constants: HashMap<u32, IntVar>,
    set_constants: HashMap<IntSet, SetVar>,
    core: Vec<VarRef>,
    inconsistent: Vec<String>,
}

impl Model {
    pub fn new_int_var(&mut self, name: impl Into<String>, domain: IntSet) -> IntVar {
        let name = name.into();
        if domain.is_empty() {
            warn!("integer variable {name} is created with an empty domain");
            self.inconsistent.push(name.clone());
        }
        self.ints.push(IntVarInfo {
            name,
            initial: domain,
            propagators: Vec::new(),
            constant: false,
        })
    }

    /// A set variable whose cardinality is only limited by `lower` and `upper`.
    pub fn new_set_var(&mut self, name: impl Into<String>, lower: IntSet, upper: IntSet) -> SetVar {
        let ucard = upper.len() as u32;
        self.new_set_var_with_cardinality(name, lower, upper, 0, ucard)
    }

    pub fn new_set_var_with_cardinality(
        &mut self,
        name: impl Into<String>,
        lower: IntSet,
        upper: IntSet,
        lcard: u32,
        ucard: u32,
    ) -> SetVar {
        let name = name.into();
        let initial = match SetBounds::new(lower, upper, lcard, ucard) {
            Ok(bounds) => bounds,
            Err(error) => {
                warn!("set variable {name} is created with inconsistent bounds: {error}");
                self.inconsistent.push(name.clone());
                SetBounds::determined(IntSet::new())
            }
        };
        self.sets.push(SetVarInfo {
            name,
            initial,
            propagators: Vec::new(),
            constant: false,
        })
    }

    /// The determined integer variable `value`. Asking twice yields the same variable.
    pub fn int_constant(&mut self, value: u32) -> IntVar {
        if let Some(&var) = self.int_constants.get(&value) {
            return var;
        }
        let var = self.ints.push(IntVarInfo {
            name: value.to_string(),
            initial: IntSet::singleton(value),
            propagators: Vec::new(),
            constant: true,
        });
        let _ = self.int_constants.insert(value, var);
        var
    }

    /// The determined set variable `value`. Asking twice yields the same variable.
    pub fn set_constant(&mut self, value: IntSet) -> SetVar {
        if let Some(&var) = self.set_constants.get(&value) {
            return var;
        }
        let var = self.sets.push(SetVarInfo {
            name: value.to_string(),
            initial: SetBounds::determined(value.clone()),
            propagators: Vec::new(),
            constant: true,
        });
        let _ = self.set_constants.insert(value, var);
        var
    }

    /// Mark `var` as a core variable: spaces only succeed when it is determined, and the
    /// distributor only branches on core variables.
    pub fn make_core(&mut self, var: impl Into<VarRef>) {
        let var = var.into();
        if !self.is_constant(var) && !self.core.contains(&var) {
            self.core.push(var);
        }
    }

    /// Start posting `constraint`; see [`ConstraintPoster`].
    pub fn add_constraint<C: Constraint>(&mut self, constraint: C) -> ConstraintPoster<'_, C> {
        ConstraintPoster {
            model: self,
            constraint,
            tag: PropagatorTag::default(),
        }
    }

    /// Register a propagator with every non-constant variable in its scope.
    pub fn add_propagator(
        &mut self,
        propagator: Box<dyn Propagator>,
        tag: PropagatorTag,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        if !(0.0..=1.0).contains(&tag.weight) {
            return Err(ConstraintOperationError::InvalidWeight(tag.weight));
        }
        propagator.validate(self)?;
        let scope = propagator.scope();
        let id = self.propagators.add(propagator, tag);
        for var in scope.iter() {
            let propagators = match var {
                VarRef::Int(var) if !self.ints[var].constant => &mut self.ints[var].propagators,
                VarRef::Set(var) if !self.sets[var].constant => &mut self.sets[var].propagators,
                _ => continue,
            };
            if propagators.last() != Some(&id) {
                propagators.push(id);
            }
        }
        Ok(id)
    }

    pub fn int_name(&self, var: IntVar) -> &str {
        &self.ints[var].name
    }

    pub fn set_name(&self, var: SetVar) -> &str {
        &self.sets[var].name
    }

    pub fn name(&self, var: VarRef) -> &str {
        match var {
            VarRef::Int(var) => self.int_name(var),
            VarRef::Set(var) => self.set_name(var),
        }
    }

    pub fn initial_domain(&self, var: IntVar) -> &IntSet {
        &self.ints[var].initial
    }

    pub fn initial_bounds(&self, var: SetVar) -> &SetBounds {
        &self.sets[var].initial
    }

    pub fn is_constant(&self, var: VarRef) -> bool {
        match var {
            VarRef::Int(var) => self.ints[var].constant,
            VarRef::Set(var) => self.sets[var].constant,
        }
    }

    pub fn propagators_of(&self, var: VarRef) -> &[PropagatorId] {
        match var {
            VarRef::Int(var) => &self.ints[var].propagators,
            VarRef::Set(var) => &self.sets[var].propagators,
        }
    }

    pub fn core_variables(&self) -> &[VarRef] {
        &self.core
    }

    pub fn num_int_vars(&self) -> usize {
        self.ints.len()
    }

    pub fn num_set_vars(&self) -> usize {
        self.sets.len()
    }

    pub fn int_vars(&self) -> impl Iterator<Item = IntVar> + '_ {
        self.ints.keys()
    }

    pub fn set_vars(&self) -> impl Iterator<Item = SetVar> + '_ {
        self.sets.keys()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    pub fn propagator_ids(&self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.propagators.ids()
    }

    pub fn propagator(&self, id: PropagatorId) -> &dyn Propagator {
        &self.propagators[id]
    }

    pub fn propagator_tag(&self, id: PropagatorId) -> &PropagatorTag {
        self.propagators.tag(id)
    }

    /// The concrete propagator behind `id`, if it is a `P`.
    pub fn get_propagator<P: Propagator>(&self, id: PropagatorId) -> Option<&P> {
        self.propagators.get_propagator(id)
    }

    /// The names of variables that were created with inconsistent bounds. A model with such
    /// variables has no solution.
    pub fn inconsistent_variables(&self) -> &[String] {
        &self.inconsistent
    }
}

/// A pending [`Model::add_constraint`] call; configure the weight and origin, then [`post`].
///
/// [`post`]: ConstraintPoster::post
#[must_use = "a constraint is only added to the model once it is posted"]
#[derive(Debug)]
pub struct ConstraintPoster<'model, C> {
    model: &'model mut Model,
    constraint: C,
    tag: PropagatorTag,
}

impl<C: Constraint> ConstraintPoster<'_, C> {
    /// The penalty for a failure of the posted propagators. Weights below the space's
    /// `max_penalty` make the constraint lenient.
    pub fn weight(mut self, weight: f64) -> Self {
        self.tag.weight = weight;
        self
    }

    /// Attribute the posted propagators to a principle in traces and error logs.
    pub fn principle(mut self, principle: impl Into<Rc<str>>) -> Self {
        self.tag.principle = Some(principle.into());
        self
    }

    pub fn post(self) -> Result<(), ConstraintOperationError> {
        self.constraint.post(self.model, &self.tag)
    }
}
