//! Propagators, the context they run in and the bookkeeping the space engine needs for them.
//!
//! A propagator implements [`Propagator`]: given the bounds in a [`Space`](crate::Space) it
//! removes values that cannot be part of any solution of its relation, reports whether the
//! relation is already guaranteed to hold (entailed) and detects when it cannot hold (failure).
//! Propagators are stateless; everything that changes during search lives in the space.
mod context;
mod propagator;
mod propagator_id;
mod queue;
mod scope;
mod store;

pub use context::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub(crate) use queue::PropagatorQueue;
pub use scope::Scope;
pub(crate) use store::PropagatorStore;
pub use store::PropagatorTag;
