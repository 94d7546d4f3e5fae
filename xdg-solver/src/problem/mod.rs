//! An XDG problem: a sentence, the model its principles compile into and the search over it.
pub mod sentence;
pub(crate) mod variables;

use std::collections::BTreeMap;
use std::rc::Rc;

use log::info;
use log::warn;
use xdg_core::branching::Distributor;
use xdg_core::branching::SmallestUpper;
use xdg_core::search::IteratedSolution;
use xdg_core::search::SearchOptions;
use xdg_core::search::SearchStatistics;
use xdg_core::search::SolutionIterator;
use xdg_core::search::StopReason;
use xdg_core::termination::TerminationCondition;
use xdg_core::Model;
use xdg_core::Space;
use xdg_core::SpaceOptions;
use xdg_grammar::FeatureValue;
use xdg_grammar::Grammar;

use self::sentence::Sentence;
use self::variables::Variables;
use crate::principles;
use crate::projection;
use crate::projection::Multigraph;
use crate::ProblemError;

/// What is known about a sentence before search, and how much the principles count.
///
/// Dimensions are written `lang:dim`, or just `dim` for a dimension of the source language.
#[derive(Clone, Debug, Default)]
pub struct ProblemOptions {
    /// Arcs that must be present, as `(mother, daughter)` pairs by dimension and label. A label
    /// listed here has exactly these arcs.
    pub pre_arcs: BTreeMap<String, BTreeMap<String, Vec<(usize, usize)>>>,
    /// Agreement values nodes must carry, as `(node, value)` pairs by dimension and feature.
    pub pre_agrs: BTreeMap<String, BTreeMap<String, Vec<(usize, FeatureValue)>>>,
    /// The weight of the constraints of a principle, by principle name; 1 when absent. Failing
    /// constraints of weight below the maximum penalty are tolerated.
    pub weights: BTreeMap<String, f64>,
}

/// A sentence compiled into a constraint model.
#[derive(Debug)]
pub struct Problem<'g> {
    sentence: Sentence<'g>,
    model: Rc<Model>,
    variables: Variables,
}

impl<'g> Problem<'g> {
    /// Assemble the nodes of `tokens` in language `source`, translated into `targets`, and
    /// compile the principles of all their dimensions.
    pub fn new(
        grammar: &'g Grammar,
        source: &str,
        targets: &[&str],
        tokens: &[String],
        options: &ProblemOptions,
    ) -> Result<Problem<'g>, ProblemError> {
        let sentence = Sentence::assemble(grammar, source, targets, tokens)?;
        let (model, variables) = principles::compile(&sentence, options)?;

        for name in model.inconsistent_variables() {
            warn!("variable {name} has inconsistent initial bounds");
        }
        info!(
            "compiled \"{}\" into {} integer variables, {} set variables and {} propagators",
            sentence.text(),
            model.num_int_vars(),
            model.num_set_vars(),
            model.num_propagators()
        );

        Ok(Problem {
            sentence,
            model: Rc::new(model),
            variables,
        })
    }

    pub fn sentence(&self) -> &Sentence<'g> {
        &self.sentence
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Search the solutions of the problem, distributing on the core variable with the smallest
    /// upper bound. Dropping the returned iterator cancels the search.
    pub fn solutions<T: TerminationCondition>(
        &self,
        space_options: SpaceOptions,
        search_options: SearchOptions,
        termination: T,
    ) -> Solutions<'_, 'g, T> {
        self.solutions_with(space_options, search_options, SmallestUpper, termination)
    }

    /// Like [`Problem::solutions`], splitting spaces with `distributor`.
    pub fn solutions_with<D: Distributor, T: TerminationCondition>(
        &self,
        space_options: SpaceOptions,
        search_options: SearchOptions,
        distributor: D,
        termination: T,
    ) -> Solutions<'_, 'g, T, D> {
        Solutions {
            problem: self,
            iterator: SolutionIterator::new(
                Rc::clone(&self.model),
                space_options,
                search_options,
                distributor,
                termination,
            ),
        }
    }

    /// Read the graphs of all dimensions off a solved space.
    pub fn project(&self, space: &Space) -> Multigraph {
        projection::project(&self.sentence, &self.variables, space)
    }
}

/// The solutions of a [`Problem`], projected into multigraphs.
#[derive(Debug)]
pub struct Solutions<'p, 'g, T, D = SmallestUpper> {
    problem: &'p Problem<'g>,
    iterator: SolutionIterator<D, T>,
}

impl<T: TerminationCondition, D: Distributor> Solutions<'_, '_, T, D> {
    /// Why the search ended before exhausting the search tree, if it did.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.iterator.stop_reason()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        self.iterator.statistics()
    }
}

impl<T: TerminationCondition, D: Distributor> Iterator for Solutions<'_, '_, T, D> {
    type Item = Multigraph;

    fn next(&mut self) -> Option<Multigraph> {
        match self.iterator.next_solution() {
            IteratedSolution::Solution(space) => Some(self.problem.project(&space)),
            IteratedSolution::Finished => None,
            IteratedSolution::Unknown(reason) => {
                info!("search stopped: {reason}");
                None
            }
        }
    }
}
