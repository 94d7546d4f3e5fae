//! Handles for the variables of a [`Model`](crate::Model) and the bounds they range over.
mod set_bounds;
mod variable_handles;

pub use set_bounds::SetBounds;
pub use variable_handles::*;
