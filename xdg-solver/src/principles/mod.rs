//! The principles of a grammar, compiled into the constraints of a problem.
//!
//! Every principle listed on a dimension becomes one [`Principle`] instance. Compilation runs in
//! two phases: first every principle allocates its variables, then every principle posts its
//! constraints. Principles are visited in rank order, so the graph of a dimension exists before
//! any principle refers to it.
mod agreement;
mod context;
mod empty_node;
mod graph;
mod group;
mod interface;
mod linking;
mod order;
mod transfer;
mod valency;

use std::fmt::Debug;

pub(crate) use context::CompilationContext;
use log::debug;
use xdg_core::Model;
use xdg_grammar::DimensionKind;
use xdg_grammar::PrincipleKind;

use crate::problem::sentence::DimId;
use crate::problem::sentence::Sentence;
use crate::problem::variables::Variables;
use crate::ProblemError;
use crate::ProblemOptions;

/// A principle instantiated on one dimension of a problem.
pub(crate) trait Principle: Debug {
    fn kind(&self) -> PrincipleKind;

    fn dimension(&self) -> DimId;

    /// Allocate the variables the principle owns.
    fn make_variables(&self, _context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        Ok(())
    }

    /// Post the propagators enforcing the principle.
    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError>;
}

/// Compile `sentence` into a model.
pub(crate) fn compile(
    sentence: &Sentence<'_>,
    options: &ProblemOptions,
) -> Result<(Model, Variables), ProblemError> {
    let mut context = CompilationContext::new(sentence, options)?;

    transfer::run(&mut context)?;

    let principles = instantiate(sentence);
    for principle in &principles {
        context.begin_principle(principle.kind(), principle.dimension());
        principle.make_variables(&mut context)?;
    }
    for principle in &principles {
        context.begin_principle(principle.kind(), principle.dimension());
        let num_before = context.model.num_propagators();
        principle.make_constraints(&mut context)?;
        debug!(
            "{} added {} propagators",
            context.principle(),
            context.model.num_propagators() - num_before
        );
    }

    debug!(
        "compiled {} principles into {} propagators",
        principles.len(),
        context.model.num_propagators()
    );
    Ok(context.finish())
}

fn instantiate(sentence: &Sentence<'_>) -> Vec<Box<dyn Principle>> {
    let mut principles: Vec<Box<dyn Principle>> = Vec::new();

    for (dim, dimension) in sentence.dimensions.iter().enumerate() {
        let kinds = &dimension.dimension.principles;
        if matches!(dimension.dimension.kind, DimensionKind::Arc { .. })
            && !kinds.iter().any(|kind| kind.is_graph())
        {
            principles.push(Box::new(graph::Graph {
                dim,
                kind: PrincipleKind::Graph,
            }));
        }

        for &kind in kinds {
            let principle: Box<dyn Principle> = match kind {
                PrincipleKind::Graph
                | PrincipleKind::Tree
                | PrincipleKind::Dag
                | PrincipleKind::Forest
                | PrincipleKind::DagDisjDaugh => Box::new(graph::Graph { dim, kind }),
                PrincipleKind::Valency => Box::new(valency::Valency { dim }),
                PrincipleKind::Order => Box::new(order::Order { dim }),
                PrincipleKind::Projectivity => Box::new(order::Projectivity { dim }),
                PrincipleKind::Agr => Box::new(agreement::Agr { dim }),
                PrincipleKind::Agreement => Box::new(agreement::Agreement { dim }),
                PrincipleKind::Government => Box::new(agreement::Government { dim }),
                PrincipleKind::ArcAgreement => Box::new(agreement::ArcAgreement { dim }),
                PrincipleKind::Group => Box::new(group::Group { dim }),
                PrincipleKind::EmptyNode => Box::new(empty_node::EmptyNode {
                    dim,
                    complex: false,
                }),
                PrincipleKind::ComplexEmptyNode => Box::new(empty_node::EmptyNode {
                    dim,
                    complex: true,
                }),
                PrincipleKind::IfAgreement => Box::new(interface::IfAgreement { dim }),
                PrincipleKind::CrossGovernment => Box::new(interface::CrossGovernment { dim }),
                PrincipleKind::CrossOrderEq => Box::new(interface::CrossOrderEq { dim }),
                PrincipleKind::Climbing => Box::new(interface::Climbing { dim }),
                PrincipleKind::Barriers => Box::new(interface::Barriers { dim }),
                PrincipleKind::LinkingEnd
                | PrincipleKind::LinkingMother
                | PrincipleKind::LinkingDaughterEnd
                | PrincipleKind::LinkingMod
                | PrincipleKind::LinkingBelowStart
                | PrincipleKind::LinkingBelowEnd
                | PrincipleKind::LinkingAboveEnd
                | PrincipleKind::LinkingAboveBelow1or2Start
                | PrincipleKind::LinkingAboveBelowStart => Box::new(linking::Linking { dim, kind }),
            };
            principles.push(principle);
        }
    }

    principles.sort_by_key(|principle| rank(principle.kind()));
    principles
}

/// Principles of a lower rank are compiled first.
fn rank(kind: PrincipleKind) -> u8 {
    match kind {
        kind if kind.is_graph() => 0,
        PrincipleKind::Valency => 1,
        PrincipleKind::Order | PrincipleKind::Projectivity => 2,
        PrincipleKind::Agr => 3,
        PrincipleKind::Agreement | PrincipleKind::Government | PrincipleKind::ArcAgreement => 4,
        PrincipleKind::Group | PrincipleKind::EmptyNode | PrincipleKind::ComplexEmptyNode => 5,
        _ => 6,
    }
}
