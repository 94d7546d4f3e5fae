//! Linking principles: an arc of the second dimension of an interface requires a related
//! configuration in the first dimension, on one of the labels the entry links the arc's label to.
use xdg_core::constraints;
use xdg_core::containers::IntSet;
use xdg_core::propagators::IntSelection;
use xdg_core::propagators::LogEquivalence;
use xdg_core::propagators::LogImplication;
use xdg_core::propagators::ReifiedInclusion;
use xdg_core::propagators::UnionSelection;
use xdg_core::variables::SetVar;
use xdg_grammar::Label;
use xdg_grammar::LinkKind;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::problem::variables::ArcVariables;
use crate::ProblemError;

/// For every arc `v -l2-> w` of the second dimension where the entry of `v` links `l2` to a set of
/// labels of the first dimension, `w` is related to `v` in the first dimension through one of
/// those labels. The relation depends on the kind of linking.
#[derive(Debug)]
pub(crate) struct Linking {
    pub(crate) dim: DimId,
    pub(crate) kind: PrincipleKind,
}

impl Principle for Linking {
    fn kind(&self) -> PrincipleKind {
        self.kind
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some(link_kind) = self.kind.link_kind() else {
            return Ok(());
        };
        let Some((dim1, dim2)) = context.dimension(self.dim).related else {
            return Ok(());
        };
        let language = context.dimension(self.dim).language;
        let arcs1 = context.arcs(dim1);
        let arcs2 = context.arcs(dim2);
        let labels1 = context.labels(dim1);
        let all_nodes = context.all_nodes();

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            for l2 in context.labels(dim2) {
                let sets: Vec<IntSet> = attributes
                    .iter()
                    .map(|attributes| {
                        attributes
                            .links(link_kind)
                            .and_then(|links| links.get(&l2))
                            .map(|labels| labels.iter().copied().collect())
                            .unwrap_or_default()
                    })
                    .collect();
                if sets.iter().all(IntSet::is_empty) {
                    continue;
                }
                let used = sets.iter().fold(IntSet::new(), |used, set| used.union(set));

                let name = format!(
                    "{}[{v}][{}]",
                    context.principle(),
                    context.label_name(dim2, l2)
                );
                let linked = context.select_by_entry(language, v, format!("{name}:labels"), sets)?;

                let mut related = Vec::with_capacity(labels1.len());
                for &l1 in &labels1 {
                    if used.contains(l1) {
                        let name = format!("{name}:related[{}]", context.label_name(dim1, l1));
                        related.push(relate(context, link_kind, &arcs1, v, l1, name)?);
                    } else {
                        related.push(context.model.set_constant(IntSet::new()));
                    }
                }
                let targets =
                    context
                        .model
                        .new_set_var(format!("{name}:targets"), IntSet::new(), all_nodes.clone());
                context.post(UnionSelection::new(targets, linked, related))?;

                let arcs = match link_kind {
                    LinkKind::DaughterEnd | LinkKind::Mod => arcs2.ins[v][l2 as usize],
                    _ => arcs2.outs[v][l2 as usize],
                };
                let links = context
                    .model
                    .new_int_var(format!("{name}:links"), IntSet::range(0, 2));
                context.post(LogEquivalence::new(links, linked))?;
                let active =
                    context
                        .model
                        .new_set_var(format!("{name}:active"), IntSet::new(), all_nodes.clone());
                let none = context.model.set_constant(IntSet::new());
                context.post(IntSelection::new(active, links, vec![none, arcs]))?;

                let satisfied = context
                    .model
                    .new_int_var(format!("{name}:satisfied"), IntSet::range(0, 2));
                context.post(ReifiedInclusion::new(satisfied, active, targets))?;
                context.post(LogImplication::new(active, satisfied))?;
            }
        }
        Ok(())
    }
}

/// The nodes related to `v` through label `l1` of the first dimension.
fn relate(
    context: &mut CompilationContext<'_, '_>,
    kind: LinkKind,
    arcs: &ArcVariables,
    v: usize,
    l1: Label,
    name: String,
) -> Result<SetVar, ProblemError> {
    let l1 = l1 as usize;
    let all_nodes = context.all_nodes();
    let node_set = |context: &mut CompilationContext<'_, '_>, suffix: &str| {
        context
            .model
            .new_set_var(format!("{name}{suffix}"), IntSet::new(), all_nodes.clone())
    };

    let related = match kind {
        LinkKind::End | LinkKind::Mod => arcs.outs[v][l1],
        LinkKind::Mother | LinkKind::DaughterEnd => arcs.ins[v][l1],
        LinkKind::BelowStart => {
            let below = node_set(context, "");
            context.post(UnionSelection::new(below, arcs.outs[v][l1], arcs.eqdown.clone()))?;
            below
        }
        LinkKind::BelowEnd => {
            let ends = node_set(context, "");
            context.post(UnionSelection::new(ends, arcs.eqdown[v], arcs.outs_on(l1)))?;
            ends
        }
        LinkKind::AboveEnd => {
            let above = node_set(context, "");
            context.post(UnionSelection::new(above, arcs.ins[v][l1], arcs.equp.clone()))?;
            above
        }
        LinkKind::AboveBelow1or2Start => {
            let starts = node_set(context, ":starts");
            context.post(UnionSelection::new(starts, arcs.equp[v], arcs.outs_on(l1)))?;
            let below = node_set(context, ":below");
            context.post(UnionSelection::new(below, starts, arcs.daughters.clone()))?;
            let related = node_set(context, "");
            context.post(constraints::union(related, [starts, below]))?;
            related
        }
        LinkKind::AboveBelowStart => {
            let starts = node_set(context, ":starts");
            context.post(UnionSelection::new(starts, arcs.equp[v], arcs.outs_on(l1)))?;
            let related = node_set(context, "");
            context.post(UnionSelection::new(related, starts, arcs.eqdown.clone()))?;
            related
        }
    };
    Ok(related)
}
