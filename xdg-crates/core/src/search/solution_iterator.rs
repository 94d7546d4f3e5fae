use std::rc::Rc;
use std::time::Instant;

use log::debug;
use log::warn;

use super::frontier::Frontier;
use super::SearchOptions;
use super::SearchStatistics;
use super::StopReason;
use crate::branching::Distributor;
use crate::engine::Model;
use crate::engine::Space;
use crate::engine::SpaceOptions;
use crate::engine::SpaceStatus;
use crate::termination::ExpansionBudget;
use crate::termination::TerminationCondition;

/// Lazily enumerates the succeeded spaces of a model.
#[derive(Debug)]
pub struct SolutionIterator<D, T> {
    frontier: Frontier,
    distributor: D,
    termination: T,
    cutoff: ExpansionBudget,
    options: SearchOptions,
    statistics: SearchStatistics,
    stopped: Option<StopReason>,
}

impl<D: Distributor, T: TerminationCondition> SolutionIterator<D, T> {
    /// Start a search from the root space of `model`.
    pub fn new(
        model: Rc<Model>,
        space_options: SpaceOptions,
        options: SearchOptions,
        distributor: D,
        termination: T,
    ) -> Self {
        let mut frontier = Frontier::new(options.strategy);
        frontier.push(Space::root(model, space_options));

        SolutionIterator {
            frontier,
            distributor,
            termination,
            cutoff: ExpansionBudget::new(options.cutoff),
            options,
            statistics: SearchStatistics {
                peak_frontier_size: 1,
                ..SearchStatistics::default()
            },
            stopped: None,
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn termination(&self) -> &T {
        &self.termination
    }

    /// The reason the search stopped early, once [`IteratedSolution::Unknown`] has been returned.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    /// Expand spaces until the next solution is found, the frontier is exhausted or the search
    /// has to stop.
    pub fn next_solution(&mut self) -> IteratedSolution {
        let started_at = Instant::now();
        let result = self.search();
        self.statistics.time_spent_in_search_ms += started_at.elapsed().as_millis();
        result
    }

    fn search(&mut self) -> IteratedSolution {
        if let Some(reason) = self.stopped {
            return IteratedSolution::Unknown(reason);
        }

        loop {
            if let Some(reason) = self.should_stop() {
                debug!("search stops: {reason}");
                self.stopped = Some(reason);
                return IteratedSolution::Unknown(reason);
            }
            let Some(mut space) = self.frontier.pop() else {
                return IteratedSolution::Finished;
            };

            let status = space.propagate();
            self.record_expansion(&space);

            match status {
                SpaceStatus::Failed => self.statistics.num_failed_spaces += 1,
                SpaceStatus::Succeeded => {
                    self.statistics.num_solutions += 1;
                    debug!("{} succeeded (penalty {:.2})", space.name(), space.penalty());
                    return IteratedSolution::Solution(space);
                }
                SpaceStatus::Distributable => match self.distributor.choose(&space) {
                    Some(choice) => {
                        self.frontier.push_children(space.distribute(&choice));
                        self.statistics.peak_frontier_size =
                            self.statistics.peak_frontier_size.max(self.frontier.len());
                    }
                    None => {
                        warn!(
                            "{} is distributable but the distributor made no choice",
                            space.name()
                        );
                        self.statistics.num_failed_spaces += 1;
                    }
                },
            }
        }
    }

    fn should_stop(&mut self) -> Option<StopReason> {
        if self
            .options
            .max_solutions
            .is_some_and(|max| self.statistics.num_solutions >= max)
        {
            Some(StopReason::SolutionLimit)
        } else if self.cutoff.should_stop() {
            Some(StopReason::Cutoff)
        } else if self.termination.should_stop() {
            Some(StopReason::Terminated)
        } else {
            None
        }
    }

    fn record_expansion(&mut self, space: &Space) {
        self.cutoff.space_expanded();
        self.termination.space_expanded();

        let counts = space.counts();
        self.statistics.num_expansions += 1;
        self.statistics.num_propagations += counts.num_propagations;
        self.statistics.num_propagator_failures += counts.num_failures;
        self.statistics.num_tolerated_failures += counts.num_tolerated_failures;
        self.statistics
            .propagations_per_expansion
            .record(counts.num_propagations);
    }
}

impl<D: Distributor, T: TerminationCondition> Iterator for SolutionIterator<D, T> {
    type Item = Space;

    fn next(&mut self) -> Option<Space> {
        match self.next_solution() {
            IteratedSolution::Solution(space) => Some(space),
            IteratedSolution::Finished | IteratedSolution::Unknown(_) => None,
        }
    }
}

/// The outcome of [`SolutionIterator::next_solution`].
#[allow(
    clippy::large_enum_variant,
    reason = "solutions are not stored in bulk"
)]
#[derive(Debug)]
pub enum IteratedSolution {
    /// A new solution was found.
    Solution(Space),
    /// The frontier is exhausted; no more solutions exist.
    Finished,
    /// The search stopped before the frontier was exhausted.
    Unknown(StopReason),
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::IteratedSolution;
    use super::SolutionIterator;
    use crate::branching::SmallestUpper;
    use crate::containers::IntSet;
    use crate::engine::propagation::ReadDomains;
    use crate::engine::variables::IntVar;
    use crate::engine::Model;
    use crate::engine::SpaceOptions;
    use crate::propagators::CardinalityEq;
    use crate::propagators::LessThan;
    use crate::search::SearchOptions;
    use crate::search::SearchStrategy;
    use crate::search::StopReason;
    use crate::termination::Indefinite;

    fn chain() -> (Model, IntVar, IntVar) {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::range(0, 3));
        let y = model.new_int_var("y", IntSet::range(0, 3));
        model.make_core(x);
        model.make_core(y);
        model
            .add_constraint(LessThan::new(x, y))
            .post()
            .expect("valid constraint");
        (model, x, y)
    }

    fn solutions(model: Model, x: IntVar, y: IntVar, strategy: SearchStrategy) -> Vec<(u32, u32)> {
        let options = SearchOptions {
            strategy,
            ..SearchOptions::default()
        };
        SolutionIterator::new(
            Rc::new(model),
            SpaceOptions::default(),
            options,
            SmallestUpper,
            Indefinite,
        )
        .map(|space| {
            (
                space.int_value(x).expect("x is core"),
                space.int_value(y).expect("y is core"),
            )
        })
        .collect()
    }

    #[test]
    fn depth_first_enumerates_in_choice_order() {
        let (model, x, y) = chain();
        assert_eq!(
            solutions(model, x, y, SearchStrategy::DepthFirst),
            vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn solved_sets_are_determined_and_match_their_cardinality() {
        let mut model = Model::default();
        let set = model.new_set_var("s", IntSet::new(), IntSet::range(0, 3));
        let size = model.new_int_var("n", IntSet::range(1, 3));
        model.make_core(set);
        model.make_core(size);
        model
            .add_constraint(CardinalityEq::new(set, size))
            .post()
            .expect("valid constraint");

        let solved = SolutionIterator::new(
            Rc::new(model),
            SpaceOptions::default(),
            SearchOptions::default(),
            SmallestUpper,
            Indefinite,
        )
        .map(|space| {
            let bounds = space.set_bounds(set);
            assert!(bounds.is_determined());
            assert_eq!(bounds.lcard(), bounds.ucard());
            let value = bounds.value().expect("determined").clone();
            assert_eq!(value.len() as u32, bounds.lcard());
            assert_eq!(space.int_value(size), Some(bounds.lcard()));
            value
        })
        .collect::<Vec<_>>();

        // the subsets of {0, 1, 2} with one or two elements
        assert_eq!(solved.len(), 6);
    }

    #[test]
    fn every_strategy_finds_the_same_solutions() {
        let (model, x, y) = chain();
        let mut expected = solutions(model, x, y, SearchStrategy::DepthFirst);
        expected.sort();

        for strategy in [SearchStrategy::BreadthFirst, SearchStrategy::BestFirst] {
            let (model, x, y) = chain();
            let mut found = solutions(model, x, y, strategy);
            found.sort();
            assert_eq!(found, expected, "{strategy}");
        }
    }

    #[test]
    fn cutoff_stops_the_search() {
        let (model, _, _) = chain();
        let options = SearchOptions {
            cutoff: 1,
            ..SearchOptions::default()
        };
        let mut iterator = SolutionIterator::new(
            Rc::new(model),
            SpaceOptions::default(),
            options,
            SmallestUpper,
            Indefinite,
        );

        assert!(matches!(
            iterator.next_solution(),
            IteratedSolution::Unknown(StopReason::Cutoff)
        ));
        assert_eq!(iterator.statistics().num_expansions, 1);
        assert_eq!(iterator.stop_reason(), Some(StopReason::Cutoff));
    }

    #[test]
    fn solution_limit_is_honoured() {
        let (model, _, _) = chain();
        let options = SearchOptions {
            max_solutions: Some(2),
            ..SearchOptions::default()
        };
        let mut iterator = SolutionIterator::new(
            Rc::new(model),
            SpaceOptions::default(),
            options,
            SmallestUpper,
            Indefinite,
        );

        assert!(matches!(iterator.next_solution(), IteratedSolution::Solution(_)));
        assert!(matches!(iterator.next_solution(), IteratedSolution::Solution(_)));
        assert!(matches!(
            iterator.next_solution(),
            IteratedSolution::Unknown(StopReason::SolutionLimit)
        ));
    }

    #[test]
    fn failed_root_finishes_without_solutions() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::from([2]));
        let y = model.new_int_var("y", IntSet::from([1]));
        model
            .add_constraint(LessThan::new(x, y))
            .post()
            .expect("valid constraint");

        let mut iterator = SolutionIterator::new(
            Rc::new(model),
            SpaceOptions::default(),
            SearchOptions::default(),
            SmallestUpper,
            Indefinite,
        );
        assert!(matches!(iterator.next_solution(), IteratedSolution::Finished));
        assert_eq!(iterator.statistics().num_failed_spaces, 1);
    }
}
