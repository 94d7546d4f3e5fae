//! # XDG solver
//! Parsing and generation with Extensible Dependency Grammar.
//!
//! A [`Problem`] pairs the words of a sentence with their lexical entries in a source language
//! and, for translation, in any number of target languages. The principles of every dimension of
//! these languages are compiled into constraints over finite integer and set variables, and every
//! solution of the constraint model is read back as a [`Multigraph`]: one dependency graph per
//! dimension, together with the sentences generated in the target languages.
//!
//! ```no_run
//! # use std::path::Path;
//! # use xdg_core::search::SearchOptions;
//! # use xdg_core::termination::Indefinite;
//! # use xdg_core::SpaceOptions;
//! # use xdg_grammar::format::LanguageSource;
//! # use xdg_grammar::Grammar;
//! # use xdg_solver::Problem;
//! # use xdg_solver::ProblemOptions;
//! let english = LanguageSource::read(Path::new("eng.json"), &[]).unwrap();
//! let grammar = Grammar::new(vec![english]).unwrap();
//! let tokens = ["the", "dog", "barks"].map(str::to_owned);
//!
//! let problem = Problem::new(&grammar, "eng", &[], &tokens, &ProblemOptions::default()).unwrap();
//! for solution in problem.solutions(SpaceOptions::default(), SearchOptions::default(), Indefinite) {
//!     println!("{solution}");
//! }
//! ```
mod error;
mod principles;
pub mod problem;
pub mod projection;

pub use error::ProblemError;
pub use problem::sentence::Sentence;
pub use problem::Problem;
pub use problem::ProblemOptions;
pub use problem::Solutions;
pub use projection::Graph;
pub use projection::Multigraph;
