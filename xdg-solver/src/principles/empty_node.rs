use xdg_core::constraints;
use xdg_core::containers::IntSet;
use xdg_core::propagators::LogImplication;
use xdg_core::propagators::ReifiedMembership;
use xdg_grammar::GrammarError;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::problem::sentence::NodeKind;
use crate::problem::sentence::DELETION_LABEL;
use crate::ProblemError;

/// An empty node exists exactly when the entry introducing it is selected; otherwise it hangs off
/// the end-of-sentence node as deleted. In the complex variant an existing empty node is moreover
/// a daughter of the node that introduced it, on the label its entry names.
#[derive(Debug)]
pub(crate) struct EmptyNode {
    pub(crate) dim: DimId,
    pub(crate) complex: bool,
}

impl Principle for EmptyNode {
    fn kind(&self) -> PrincipleKind {
        if self.complex {
            PrincipleKind::ComplexEmptyNode
        } else {
            PrincipleKind::EmptyNode
        }
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let dimension = context.dimension(self.dim);
        if dimension.language != 0 {
            return Ok(());
        }
        let abbrev = dimension.dimension.abbrev.as_str();
        let arcs = context.arcs(self.dim);
        let eos = context.eos();
        let sentence = context.sentence;

        for node in &sentence.nodes {
            let NodeKind::Empty {
                trigger,
                entry,
                dimension,
                label,
            } = &node.kind
            else {
                continue;
            };
            if dimension != abbrev {
                continue;
            }

            let deletion =
                context
                    .label(self.dim, DELETION_LABEL)
                    .ok_or_else(|| GrammarError::UnknownLabel {
                        dimension: dimension.clone(),
                        label: DELETION_LABEL.to_owned(),
                    })?;
            let e = node.index;
            let name = format!("{}[{e}]", context.principle());

            let exists = context
                .model
                .new_int_var(format!("{name}:exists"), IntSet::range(0, 2));
            let lexvar = context.lexvar(0, *trigger);
            let introducing = context.model.set_constant(IntSet::singleton(*entry as u32));
            context.post(ReifiedMembership::new(exists, lexvar, introducing))?;

            let deleted = context
                .model
                .new_int_var(format!("{name}:deleted"), IntSet::range(0, 2));
            let index = context.model.int_constant(e as u32);
            context.post(ReifiedMembership::new(
                deleted,
                index,
                arcs.outs[eos][deletion as usize],
            ))?;
            context.post(constraints::negation(deleted, exists))?;

            if self.complex {
                let attached = context
                    .model
                    .new_int_var(format!("{name}:attached"), IntSet::range(0, 2));
                context.post(ReifiedMembership::new(
                    attached,
                    index,
                    arcs.outs[*trigger][*label as usize],
                ))?;
                context.post(LogImplication::new(exists, attached))?;
            }
        }
        Ok(())
    }
}
