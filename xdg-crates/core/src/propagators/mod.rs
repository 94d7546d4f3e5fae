//! The propagators of the engine.
//!
//! See [`crate::propagation`] for how propagators are run. Composite relations such as partition
//! or disjointness are not propagators of their own; they are decomposed in
//! [`crate::constraints`].
mod basic;
mod cardinality;
mod iv_member_sv;
mod less_than;
mod logic;
mod reified;
mod set_convexity;
mod set_inverse;
mod set_precedence;
mod subset_union;
mod superset_intersection;

pub mod selection;

pub use basic::BasicConstraint;
pub use cardinality::*;
pub use iv_member_sv::IvMemberSv;
pub use less_than::LessThan;
pub use logic::*;
pub use reified::*;
pub use selection::*;
pub use set_convexity::SetConvexity;
pub use set_inverse::SetInverse;
pub use set_precedence::SetPrecedence;
pub use subset_union::SubsetUnion;
pub use superset_intersection::SupersetIntersection;
