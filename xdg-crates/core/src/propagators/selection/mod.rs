//! Selection propagators: a main variable is tied to the sequence variables picked out by a
//! selection variable.
//!
//! The selector of every propagator here is bounded: it may only take values below a fixed bound
//! (the number of sequence variables, or the number of encodable pairs). Selectors that can take
//! larger values are rejected when the propagator is posted. With the `lenient-selection-bounds`
//! feature they are accepted with a warning instead and the out-of-range values are discarded
//! during propagation.
mod equality_selection;
mod int_int_selection;
mod int_selection;
mod intersection_selection;
mod precedence_selection;
mod simple_equality_selection;
mod simple_precedence_selection;
mod union_selection;

pub use equality_selection::*;
pub use int_int_selection::*;
pub use int_selection::*;
pub use intersection_selection::*;
use log::warn;
pub use precedence_selection::*;
pub use simple_equality_selection::*;
pub use simple_precedence_selection::*;
pub use union_selection::*;

use crate::basic_types::ConstraintOperationError;
use crate::containers::IntSet;
use crate::engine::variables::VarRef;
use crate::engine::Model;

/// The initial candidates of `selector`: the domain of an integer selector, the upper bound of a
/// set selector.
fn initial_candidates(model: &Model, selector: VarRef) -> &IntSet {
    match selector {
        VarRef::Int(var) => model.initial_domain(var),
        VarRef::Set(var) => model.initial_bounds(var).upper(),
    }
}

/// Reject `selector` if it can initially take a value of at least `bound`.
pub(crate) fn check_selector_bound(
    model: &Model,
    selector: impl Into<VarRef>,
    bound: u32,
) -> Result<(), ConstraintOperationError> {
    let selector = selector.into();
    let Some(index) = initial_candidates(model, selector).max() else {
        return Ok(());
    };
    if index < bound {
        return Ok(());
    }

    let error = ConstraintOperationError::SelectionOutOfBounds {
        selector: model.name(selector).to_owned(),
        index,
        bound,
    };
    if cfg!(feature = "lenient-selection-bounds") {
        warn!("{error}; the excess values are discarded");
        Ok(())
    } else {
        Err(error)
    }
}

/// The values a selector with the given bound may take.
fn selectable(bound: u32) -> IntSet {
    IntSet::range(0, bound)
}
