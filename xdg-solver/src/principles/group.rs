use xdg_core::constraints;
use xdg_core::containers::IntSet;
use xdg_core::propagators::LogImplication;
use xdg_core::propagators::ReifiedInclusion;
use xdg_core::propagators::ReifiedMembership;
use xdg_core::propagators::UnionSelection;
use xdg_grammar::Attributes;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// Multiword groups. An entry with a `gid` joins group `gid`; a member (an entry without
/// `groupouts`) needs a mother in the same group, on one of its `gheads` labels or on any label
/// when it lists none. A group head requires each of its daughters on the `groupouts` labels to
/// belong to its group.
#[derive(Debug)]
pub(crate) struct Group {
    pub(crate) dim: DimId,
}

impl Principle for Group {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Group
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let language = context.dimension(self.dim).language;
        let all_labels: IntSet = context.labels(self.dim).into_iter().collect();
        let n = context.num_nodes();
        let all_nodes = context.all_nodes();

        let group_ids: IntSet = (0..n)
            .flat_map(|v| context.attributes(self.dim, v))
            .filter_map(|attributes| attributes.gid)
            .collect();
        if group_ids.is_empty() {
            return Ok(());
        }

        let mut groups = Vec::with_capacity(n);
        for v in 0..n {
            let sets = context
                .attributes(self.dim, v)
                .iter()
                .map(|attributes| attributes.gid.into_iter().collect())
                .collect();
            let name = format!("{}[{v}]", context.principle());
            groups.push(context.select_by_entry(language, v, name, sets)?);
        }

        for v in 0..n {
            let attributes = context.attributes(self.dim, v);
            if attributes.iter().any(|attributes| is_member(attributes)) {
                let name = format!("{}:member[{v}]", context.principle());
                let own = attributes
                    .iter()
                    .map(|attributes| match attributes.gid {
                        Some(gid) if is_member(attributes) => IntSet::singleton(gid),
                        _ => IntSet::new(),
                    })
                    .collect();
                let own = context.select_by_entry(language, v, format!("{name}:group"), own)?;
                let head_labels = attributes
                    .iter()
                    .map(|attributes| {
                        if attributes.gheads.is_empty() {
                            all_labels.clone()
                        } else {
                            attributes.gheads.iter().copied().collect()
                        }
                    })
                    .collect();
                let head_labels =
                    context.select_by_entry(language, v, format!("{name}:labels"), head_labels)?;

                let heads = context.model.new_set_var(
                    format!("{name}:heads"),
                    IntSet::new(),
                    all_nodes.clone(),
                );
                context.post(UnionSelection::new(heads, head_labels, arcs.ins[v].clone()))?;
                let head_groups = context.model.new_set_var(
                    format!("{name}:head_groups"),
                    IntSet::new(),
                    group_ids.clone(),
                );
                context.post(UnionSelection::new(head_groups, heads, groups.clone()))?;
                context.post(constraints::inclusion(own, head_groups))?;
            }

            if attributes.iter().any(|attributes| is_head(attributes)) {
                let name = format!("{}:head[{v}]", context.principle());
                let own = attributes
                    .iter()
                    .map(|attributes| match attributes.gid {
                        Some(gid) if is_head(attributes) => IntSet::singleton(gid),
                        _ => group_ids.clone(),
                    })
                    .collect();
                let own = context.select_by_entry(language, v, format!("{name}:group"), own)?;
                let member_labels = attributes
                    .iter()
                    .map(|attributes| attributes.groupouts.iter().copied().collect())
                    .collect();
                let member_labels =
                    context.select_by_entry(language, v, format!("{name}:labels"), member_labels)?;

                let members = context.model.new_set_var(
                    format!("{name}:members"),
                    IntSet::new(),
                    all_nodes.clone(),
                );
                context.post(UnionSelection::new(members, member_labels, arcs.outs[v].clone()))?;
                for d in (0..n).filter(|&d| d != v) {
                    let name = format!("{name}[{d}]");
                    let joins = context
                        .model
                        .new_int_var(format!("{name}:joins"), IntSet::range(0, 2));
                    let node = context.model.int_constant(d as u32);
                    context.post(ReifiedMembership::new(joins, node, members))?;
                    let shares_group = context
                        .model
                        .new_int_var(format!("{name}:shares_group"), IntSet::range(0, 2));
                    context.post(ReifiedInclusion::new(shares_group, own, groups[d]))?;
                    context.post(LogImplication::new(joins, shares_group))?;
                }
            }
        }
        Ok(())
    }
}

fn is_member(attributes: &Attributes) -> bool {
    attributes.gid.is_some() && attributes.groupouts.is_empty()
}

fn is_head(attributes: &Attributes) -> bool {
    attributes.gid.is_some() && !attributes.groupouts.is_empty()
}
