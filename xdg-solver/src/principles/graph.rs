use xdg_core::constraints;
use xdg_core::containers::IntSet;
use xdg_core::propagators::BasicConstraint;
use xdg_core::propagators::CardinalityEq;
use xdg_core::propagators::SetInverse;
use xdg_core::propagators::UnionSelection;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// The graph of an arc dimension, in one of its shapes: a plain graph, a tree, a forest or a
/// DAG. Every shape is acyclic and has no arcs into the end-of-sentence node.
#[derive(Debug)]
pub(crate) struct Graph {
    pub(crate) dim: DimId,
    pub(crate) kind: PrincipleKind,
}

impl Principle for Graph {
    fn kind(&self) -> PrincipleKind {
        self.kind
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_variables(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let _ = context.arcs(self.dim);
        Ok(())
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let eos = context.eos();
        let num_labels = context.labels(self.dim).len();

        for label in 0..num_labels {
            context.post(SetInverse::new(arcs.outs_on(label), arcs.ins_on(label)))?;
        }

        let disjoint = matches!(
            self.kind,
            PrincipleKind::Tree | PrincipleKind::Forest | PrincipleKind::DagDisjDaugh
        );
        for v in 0..context.num_nodes() {
            if disjoint {
                context.post(constraints::partition(arcs.daughters[v], arcs.outs[v].clone()))?;
                context.post(constraints::partition(arcs.mothers[v], arcs.ins[v].clone()))?;
            } else {
                context.post(constraints::union(arcs.daughters[v], arcs.outs[v].clone()))?;
                context.post(constraints::union(arcs.mothers[v], arcs.ins[v].clone()))?;
            }

            let own = context.model.set_constant(IntSet::singleton(v as u32));
            context.post(constraints::partition(arcs.eqdown[v], [own, arcs.down[v]]))?;
            context.post(UnionSelection::new(
                arcs.down[v],
                arcs.daughters[v],
                arcs.eqdown.clone(),
            ))?;
            context.post(constraints::partition(arcs.equp[v], [own, arcs.up[v]]))?;
            context.post(UnionSelection::new(
                arcs.up[v],
                arcs.mothers[v],
                arcs.equp.clone(),
            ))?;

            if v == eos {
                continue;
            }
            match self.kind {
                PrincipleKind::Tree => {
                    let one = context.model.int_constant(1);
                    context.post(CardinalityEq::new(arcs.mothers[v], one))?;
                }
                PrincipleKind::Forest => {
                    context.post(BasicConstraint::CardinalityLeq(arcs.mothers[v], 1))?;
                }
                PrincipleKind::Dag | PrincipleKind::DagDisjDaugh => {
                    context.post(BasicConstraint::CardinalityGeq(arcs.mothers[v], 1))?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}
