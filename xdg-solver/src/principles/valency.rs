use xdg_core::containers::IntSet;
use xdg_core::propagators::CardinalitySubset;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// The number of daughters and mothers of a node on every label lies within the cardinality its
/// entry gives the label; labels an entry does not mention admit no arcs.
#[derive(Debug)]
pub(crate) struct Valency {
    pub(crate) dim: DimId,
}

impl Principle for Valency {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Valency
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let language = context.dimension(self.dim).language;
        let n = context.num_nodes() as u32;
        let unconstrained = IntSet::range(0, n + 1);

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            for label in context.labels(self.dim) {
                let label_name = context.label_name(self.dim, label);
                for (direction, var) in [
                    ("outs", arcs.outs[v][label as usize]),
                    ("ins", arcs.ins[v][label as usize]),
                ] {
                    let sets: Vec<IntSet> = attributes
                        .iter()
                        .map(|attributes| {
                            let cardinalities = if direction == "outs" {
                                &attributes.outs
                            } else {
                                &attributes.ins
                            };
                            match cardinalities.get(&label) {
                                Some(cardinality) => {
                                    let (lo, hi) = cardinality.capped(n);
                                    IntSet::range(lo, hi + 1)
                                }
                                None => IntSet::singleton(0),
                            }
                        })
                        .collect();
                    if sets.iter().all(|set| unconstrained.is_subset(set)) {
                        continue;
                    }

                    let name = format!("{}:card:{direction}[{v}][{label_name}]", context.principle());
                    let counts = context.select_by_entry(language, v, name, sets)?;
                    context.post(CardinalitySubset::new(var, counts))?;
                }
            }
        }
        Ok(())
    }
}
