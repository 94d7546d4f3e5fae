//! Principles relating the two dimensions of an interface.
use std::rc::Rc;

use itertools::Itertools;
use xdg_core::constraints;
use xdg_core::containers::IntSet;
use xdg_core::propagators::EqualitySelection;
use xdg_core::propagators::LogImplication;
use xdg_core::propagators::ReifiedMembership;
use xdg_core::propagators::SimpleEqualitySelection;
use xdg_core::propagators::SimplePrecedenceSelection;
use xdg_core::propagators::UnionSelection;
use xdg_core::PairCodec;
use xdg_grammar::FeatureId;
use xdg_grammar::Label;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// The two arc dimensions related by interface dimension `dim`.
fn related(context: &CompilationContext<'_, '_>, dim: DimId) -> Option<(DimId, DimId)> {
    context.dimension(dim).related
}

/// For every `[feature1, feature2]` pair of the entry of a node, its value of `feature1` in the
/// first dimension agrees with its value of `feature2` in the second: the values are equal, or
/// related by the agreement map between the two features when the grammar has one.
#[derive(Debug)]
pub(crate) struct IfAgreement {
    pub(crate) dim: DimId,
}

impl Principle for IfAgreement {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::IfAgreement
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some((dim1, dim2)) = related(context, self.dim) else {
            return Ok(());
        };
        let language = context.dimension(self.dim).language;
        let language1 = context.language(dim1).abbrev();
        let language2 = context.language(dim2).abbrev();
        let maps = context.sentence.grammar.agreement_maps();

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            let pairs: Vec<(FeatureId, FeatureId)> = attributes
                .iter()
                .flat_map(|attributes| attributes.ifagree.iter().copied())
                .sorted()
                .dedup()
                .collect();
            if pairs.is_empty() {
                continue;
            }
            let features1: Vec<FeatureId> = pairs.iter().map(|pair| pair.0).sorted().dedup().collect();
            let features2: Vec<FeatureId> = pairs.iter().map(|pair| pair.1).sorted().dedup().collect();
            let index = |features: &[FeatureId], feature: FeatureId| {
                features.binary_search(&feature).unwrap_or_default() as u32
            };

            let codec = PairCodec::new(features2.len() as u32);
            let sets = attributes
                .iter()
                .map(|attributes| {
                    attributes
                        .ifagree
                        .iter()
                        .map(|&(f1, f2)| codec.encode(index(&features1, f1), index(&features2, f2)))
                        .collect()
                })
                .collect();
            let name = format!("{}[{v}]", context.principle());
            let selected = context.select_by_entry(language, v, name, sets)?;

            let mut mains = Vec::with_capacity(features1.len());
            for &feature in &features1 {
                mains.push(context.agreement(dim1, v, feature)?.value);
            }
            let mut seqs = Vec::with_capacity(features2.len());
            for &feature in &features2 {
                seqs.push(context.agreement(dim2, v, feature)?.set);
            }

            let mut selection = EqualitySelection::new(mains, selected, seqs);
            for &(f1, f2) in &pairs {
                if let Some(map) = maps.get((language1, f1), (language2, f2)) {
                    selection = selection.with_map(
                        index(&features1, f1),
                        index(&features2, f2),
                        Rc::from(map),
                    );
                }
            }
            context.post(selection)?;
        }
        Ok(())
    }
}

/// For every `crossgov` label of the entry of a node, its daughters on the label in the first
/// dimension carry the given value of a feature of the second dimension.
#[derive(Debug)]
pub(crate) struct CrossGovernment {
    pub(crate) dim: DimId,
}

impl Principle for CrossGovernment {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::CrossGovernment
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some((dim1, dim2)) = related(context, self.dim) else {
            return Ok(());
        };
        let language = context.dimension(self.dim).language;
        let arcs1 = context.arcs(dim1);
        let width = context
            .language(dim2)
            .features()
            .iter()
            .map(|feature| feature.num_values())
            .max()
            .unwrap_or(1)
            .max(1);
        let codec = PairCodec::new(width);

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            let governed: Vec<(Label, FeatureId)> = attributes
                .iter()
                .flat_map(|attributes| {
                    attributes
                        .crossgov
                        .iter()
                        .map(|(&label, &(feature, _))| (label, feature))
                })
                .sorted()
                .dedup()
                .collect();
            if governed.is_empty() {
                continue;
            }

            let sets = attributes
                .iter()
                .map(|attributes| {
                    attributes
                        .crossgov
                        .iter()
                        .map(|(&label, &(feature, value))| {
                            let seq = governed
                                .binary_search(&(label, feature))
                                .unwrap_or_default() as u32;
                            codec.encode(seq, value)
                        })
                        .collect()
                })
                .collect();
            let name = format!("{}[{v}]", context.principle());
            let pairs = context.select_by_entry(language, v, name, sets)?;

            let mut seqs = Vec::with_capacity(governed.len());
            for &(label, feature) in &governed {
                let name = format!(
                    "{}:values[{v}][{}]",
                    context.principle(),
                    context.label_name(dim1, label)
                );
                seqs.push(context.values_of(name, arcs1.outs[v][label as usize], dim2, feature)?);
            }
            context.post(SimpleEqualitySelection::new(pairs, seqs, width))?;
        }
        Ok(())
    }
}

/// The daughters of a node on its `ordereq` labels in the first dimension keep their relative
/// order in the surface order of the second.
#[derive(Debug)]
pub(crate) struct CrossOrderEq {
    pub(crate) dim: DimId,
}

impl Principle for CrossOrderEq {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::CrossOrderEq
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_variables(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        if let Some((_, dim2)) = related(context, self.dim) {
            let _ = context.positions(dim2)?;
        }
        Ok(())
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some((dim1, dim2)) = related(context, self.dim) else {
            return Ok(());
        };
        let language = context.dimension(self.dim).language;
        let arcs1 = context.arcs(dim1);
        let positions = context.positions(dim2)?;
        let all_nodes = context.all_nodes();

        for v in 0..context.num_nodes() {
            let sets: Vec<IntSet> = context
                .attributes(self.dim, v)
                .iter()
                .map(|attributes| attributes.ordereq.iter().copied().collect())
                .collect();
            if sets.iter().all(IntSet::is_empty) {
                continue;
            }

            let name = format!("{}[{v}]", context.principle());
            let labels = context.select_by_entry(language, v, format!("{name}:labels"), sets)?;
            let daughters =
                context
                    .model
                    .new_set_var(format!("{name}:daughters"), IntSet::new(), all_nodes.clone());
            context.post(UnionSelection::new(daughters, labels, arcs1.outs[v].clone()))?;
            context.post(SimplePrecedenceSelection::new(daughters, positions.clone()))?;
        }
        Ok(())
    }
}

/// The second dimension is a flattening of the first: the mothers of a node in the second
/// dimension are above it in the first, and everything below it in the second is below it in
/// the first.
#[derive(Debug)]
pub(crate) struct Climbing {
    pub(crate) dim: DimId,
}

impl Principle for Climbing {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Climbing
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some((dim1, dim2)) = related(context, self.dim) else {
            return Ok(());
        };
        let arcs1 = context.arcs(dim1);
        let arcs2 = context.arcs(dim2);

        for v in 0..context.num_nodes() {
            context.post(constraints::inclusion(arcs2.mothers[v], arcs1.up[v]))?;
            context.post(constraints::inclusion(arcs2.down[v], arcs1.down[v]))?;
        }
        Ok(())
    }
}

/// A node may not climb past a node blocking the label it enters with: no node strictly between
/// a node and its mother in the second dimension, on its path in the first, blocks any of its
/// in-labels.
#[derive(Debug)]
pub(crate) struct Barriers {
    pub(crate) dim: DimId,
}

impl Principle for Barriers {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Barriers
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let Some((dim1, dim2)) = related(context, self.dim) else {
            return Ok(());
        };
        let language = context.dimension(self.dim).language;
        let arcs1 = context.arcs(dim1);
        let arcs2 = context.arcs(dim2);
        let all_nodes = context.all_nodes();
        let all_labels: IntSet = context.labels(dim1).into_iter().collect();

        let mut blocks = Vec::with_capacity(context.num_nodes());
        let mut blockable = IntSet::new();
        for u in 0..context.num_nodes() {
            let sets: Vec<IntSet> = context
                .attributes(self.dim, u)
                .iter()
                .map(|attributes| attributes.blocks.iter().copied().collect())
                .collect();
            blockable = sets.iter().fold(blockable, |blockable, set| blockable.union(set));
            let name = format!("{}:blocks[{u}]", context.principle());
            blocks.push(context.select_by_entry(language, u, name, sets)?);
        }
        if blockable.is_empty() {
            return Ok(());
        }

        for v in 0..context.eos() {
            let name = format!("{}[{v}]", context.principle());
            let below_mothers =
                context
                    .model
                    .new_set_var(format!("{name}:below"), IntSet::new(), all_nodes.clone());
            context.post(UnionSelection::new(
                below_mothers,
                arcs2.mothers[v],
                arcs1.down.clone(),
            ))?;
            let path = context
                .model
                .new_set_var(format!("{name}:path"), IntSet::new(), all_nodes.clone());
            context.post(constraints::intersection(path, [arcs1.up[v], below_mothers]))?;
            let blocked = context
                .model
                .new_set_var(format!("{name}:blocked"), IntSet::new(), all_labels.clone());
            context.post(UnionSelection::new(blocked, path, blocks.clone()))?;

            for label in &blockable {
                let label_name = context.label_name(dim1, label);
                let is_blocked = context
                    .model
                    .new_int_var(format!("{name}:blocked[{label_name}]"), IntSet::range(0, 2));
                let code = context.model.int_constant(label);
                context.post(ReifiedMembership::new(is_blocked, code, blocked))?;
                let free = context
                    .model
                    .new_int_var(format!("{name}:free[{label_name}]"), IntSet::range(0, 2));
                context.post(constraints::negation(free, is_blocked))?;
                context.post(LogImplication::new(arcs1.ins[v][label as usize], free))?;
            }
        }
        Ok(())
    }
}
