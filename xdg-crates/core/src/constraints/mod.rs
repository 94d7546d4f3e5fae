//! The constraints that can be added to a [`Model`].
//!
//! A constraint is a relation over variables, enforced by one or more propagators. Every
//! propagator is a constraint of its own; the functions in this module build the composite
//! relations (union, partition, disjointness and so on) out of them.
//!
//! # Example
//! ```
//! # use xdg_core::constraints;
//! # use xdg_core::containers::IntSet;
//! # use xdg_core::Model;
//! let mut model = Model::default();
//!
//! let whole = model.new_set_var("whole", IntSet::new(), IntSet::range(0, 4));
//! let left = model.new_set_var("left", IntSet::from([0]), IntSet::range(0, 4));
//! let right = model.new_set_var("right", IntSet::new(), IntSet::range(0, 4));
//!
//! model
//!     .add_constraint(constraints::partition(whole, [left, right]))
//!     .principle("example")
//!     .post()
//!     .expect("the partition is well-formed");
//! ```
mod boolean;
mod set_algebra;

pub use boolean::*;
pub use set_algebra::*;

use crate::basic_types::ConstraintOperationError;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorTag;
use crate::engine::Model;

/// A [`Constraint`] is a relation over variables that is added to a [`Model`] before search.
///
/// All propagators a constraint posts share the [`PropagatorTag`] it is posted with: the same
/// weight and the same principle.
pub trait Constraint {
    /// Add the propagators enforcing the constraint to `model`.
    ///
    /// Fails when the constraint is malformed, for example when a selector can select past the end
    /// of its sequence.
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError>;
}

impl<P> Constraint for P
where
    P: Propagator + 'static,
{
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let _ = model.add_propagator(Box::new(self), tag.clone())?;
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        self.into_iter().try_for_each(|c| c.post(model, tag))
    }
}
