//! # XDG core
//! Finite-domain integer and set variables, the propagators over them and a propagate-and-
//! distribute search, as used to compile and solve Extensible Dependency Grammar problems.
//!
//! A [`Model`] owns the variables and the propagators; a [`Space`] holds the bounds of the
//! variables at one node of the search tree; a [`search::SolutionIterator`] enumerates the spaces
//! in which every core variable is determined.
//!
//! ```
//! # use std::rc::Rc;
//! # use xdg_core::branching::SmallestUpper;
//! # use xdg_core::constraints;
//! # use xdg_core::containers::IntSet;
//! # use xdg_core::search::SearchOptions;
//! # use xdg_core::search::SolutionIterator;
//! # use xdg_core::termination::Indefinite;
//! # use xdg_core::Model;
//! # use xdg_core::SpaceOptions;
//! let mut model = Model::default();
//! let a = model.new_set_var("a", IntSet::new(), IntSet::range(0, 2));
//! let b = model.new_set_var("b", IntSet::new(), IntSet::range(0, 2));
//! let whole = model.set_constant(IntSet::range(0, 2));
//! model.make_core(a);
//! model.make_core(b);
//! model
//!     .add_constraint(constraints::partition(whole, [a, b]))
//!     .post()
//!     .expect("well-formed partition");
//!
//! let solutions = SolutionIterator::new(
//!     Rc::new(model),
//!     SpaceOptions::default(),
//!     SearchOptions::default(),
//!     SmallestUpper,
//!     Indefinite,
//! );
//! assert_eq!(solutions.count(), 4);
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
#[doc(hidden)]
pub mod xdg_asserts;

pub mod branching;
pub mod constraints;
pub mod propagators;
pub mod search;
pub mod statistics;
pub mod termination;

pub use convert_case;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PairCodec;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::PropagatorState;
pub use crate::basic_types::VariableError;
pub use crate::engine::propagation;
pub use crate::engine::variables;
pub use crate::engine::ConstraintPoster;
pub use crate::engine::Model;
pub use crate::engine::PropagationCounts;
pub use crate::engine::PropagatorStatus;
pub use crate::engine::Space;
pub use crate::engine::SpaceOptions;
pub use crate::engine::SpaceStatus;
