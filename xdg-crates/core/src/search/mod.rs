//! Propagate-and-distribute search over [`Space`]s.
//!
//! The search is exposed as a [`SolutionIterator`]: every call to
//! [`SolutionIterator::next_solution`] resumes from the frontier left by the previous call, so
//! solutions are produced lazily and the search is cancelled by dropping the iterator.
mod frontier;
mod solution_iterator;

use std::fmt::Display;

pub use solution_iterator::IteratedSolution;
pub use solution_iterator::SolutionIterator;

use crate::create_statistics_struct;
use crate::statistics::Mean;
#[cfg(doc)]
use crate::Space;

/// The order in which the frontier of distributable spaces is explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SearchStrategy {
    /// Explore the positive child of every distribution first.
    #[default]
    #[cfg_attr(feature = "clap", value(name = "dfs"))]
    DepthFirst,
    /// Explore the search tree level by level.
    #[cfg_attr(feature = "clap", value(name = "bfs"))]
    BreadthFirst,
    /// Explore the space with the fewest undetermined core variables first.
    #[cfg_attr(feature = "clap", value(name = "best"))]
    BestFirst,
}

impl Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::DepthFirst => write!(f, "dfs"),
            SearchStrategy::BreadthFirst => write!(f, "bfs"),
            SearchStrategy::BestFirst => write!(f, "best"),
        }
    }
}

/// Options of one search.
#[derive(Clone, Copy, Debug)]
pub struct SearchOptions {
    pub strategy: SearchStrategy,
    /// The maximum number of spaces that are expanded.
    pub cutoff: u64,
    /// Stop after this many solutions; unbounded when `None`.
    pub max_solutions: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            strategy: SearchStrategy::default(),
            cutoff: 1000,
            max_solutions: None,
        }
    }
}

/// Why a search stopped before its frontier was exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The expansion cutoff of [`SearchOptions`] was reached.
    Cutoff,
    /// [`SearchOptions::max_solutions`] solutions were found.
    SolutionLimit,
    /// The [`TerminationCondition`](crate::termination::TerminationCondition) triggered.
    Terminated,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Cutoff => write!(f, "cutoff reached"),
            StopReason::SolutionLimit => write!(f, "solution limit reached"),
            StopReason::Terminated => write!(f, "search terminated"),
        }
    }
}

create_statistics_struct!(
    /// Counters of one search.
    SearchStatistics {
        /// The number of spaces taken from the frontier and propagated.
        num_expansions: u64,
        num_failed_spaces: u64,
        num_solutions: u64,
        num_propagations: u64,
        num_propagator_failures: u64,
        /// Propagator failures that did not push the penalty of their space over the maximum.
        num_tolerated_failures: u64,
        peak_frontier_size: usize,
        propagations_per_expansion: Mean<u64>,
        time_spent_in_search_ms: u128,
    }
);
