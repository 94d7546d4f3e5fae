use xdg_core::containers::IntSet;
use xdg_core::propagators::PrecedenceSelection;
use xdg_core::propagators::SetConvexity;
use xdg_core::propagators::UnionSelection;
use xdg_core::variables::SetVar;
use xdg_core::PairCodec;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// The daughters of a node are ordered by label as its entry prescribes. Every sequence in the
/// `order` attribute of an entry orders each of its labels before all labels following it; the
/// node itself takes part as `^`.
#[derive(Debug)]
pub(crate) struct Order {
    pub(crate) dim: DimId,
}

impl Principle for Order {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Order
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_variables(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let _ = context.positions(self.dim)?;
        Ok(())
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let positions = context.positions(self.dim)?;
        let output = context.dimension(self.dim).is_output();
        let language = context.dimension(self.dim).language;
        let num_labels = context.labels(self.dim).len();
        let codec = PairCodec::new(num_labels as u32 + 1);

        for v in 0..context.num_nodes() {
            let sets: Vec<IntSet> = context
                .attributes(self.dim, v)
                .iter()
                .map(|attributes| {
                    attributes
                        .order
                        .iter()
                        .flat_map(|sequence| {
                            sequence.iter().enumerate().flat_map(|(i, &before)| {
                                sequence[i + 1..]
                                    .iter()
                                    .map(move |&after| codec.encode(before, after))
                            })
                        })
                        .collect()
                })
                .collect();
            if sets.iter().all(IntSet::is_empty) {
                continue;
            }

            let name = format!("{}[{v}]", context.principle());
            let pairs = context.select_by_entry(language, v, name, sets)?;

            let mut seqs = Vec::with_capacity(num_labels + 1);
            for label in 0..num_labels {
                let daughters = arcs.outs[v][label];
                if output {
                    let label_name = context.label_name(self.dim, label as u32);
                    let name = format!("{}:dpos[{v}][{label_name}]", context.principle());
                    seqs.push(surface_positions(context, name, daughters, &positions)?);
                } else {
                    seqs.push(daughters);
                }
            }
            seqs.push(positions[v]);

            context.post(PrecedenceSelection::new(pairs, seqs))?;
        }
        Ok(())
    }
}

/// The subtree of every node is a contiguous stretch of the surface order.
#[derive(Debug)]
pub(crate) struct Projectivity {
    pub(crate) dim: DimId,
}

impl Principle for Projectivity {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Projectivity
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_variables(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let _ = context.positions(self.dim)?;
        Ok(())
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let positions = context.positions(self.dim)?;
        let output = context.dimension(self.dim).is_output();

        for v in 0..context.eos() {
            let span = if output {
                let name = format!("{}[{v}]", context.principle());
                surface_positions(context, name, arcs.eqdown[v], &positions)?
            } else {
                arcs.eqdown[v]
            };
            context.post(SetConvexity::new(span))?;
        }
        Ok(())
    }
}

/// The surface positions of `nodes`.
fn surface_positions(
    context: &mut CompilationContext<'_, '_>,
    name: String,
    nodes: SetVar,
    positions: &[SetVar],
) -> Result<SetVar, ProblemError> {
    let upper = context.all_nodes();
    let mapped = context.model.new_set_var(name, IntSet::new(), upper);
    context.post(UnionSelection::new(mapped, nodes, positions.to_vec()))?;
    Ok(mapped)
}
