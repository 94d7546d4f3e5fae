//! Agreement features: the values nodes carry, agreement between mothers and daughters,
//! government of daughters and values determined by the presence of an arc.
use itertools::Itertools;
use xdg_core::containers::IntSet;
use xdg_core::propagators::EqualitySelection;
use xdg_core::propagators::IntSelection;
use xdg_core::propagators::IvMemberSv;
use xdg_core::propagators::LogEquivalence;
use xdg_core::propagators::SimpleEqualitySelection;
use xdg_core::PairCodec;
use xdg_grammar::FeatureId;
use xdg_grammar::Label;
use xdg_grammar::PrincipleKind;

use super::CompilationContext;
use super::Principle;
use crate::problem::sentence::DimId;
use crate::ProblemError;

/// Every node carries one value of every feature of its language, among those its entry admits.
#[derive(Debug)]
pub(crate) struct Agr {
    pub(crate) dim: DimId,
}

impl Principle for Agr {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Agr
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_variables(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let num_features = context.language(self.dim).features().len() as FeatureId;
        for v in 0..context.num_nodes() {
            for feature in 0..num_features {
                let _ = context.agreement(self.dim, v, feature)?;
            }
        }
        Ok(())
    }

    fn make_constraints(&self, _: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        Ok(())
    }
}

/// For every `[label, mother feature, daughter feature]` triple of the entry of a node, the
/// daughters on the label carry the node's value of the mother feature as their value of the
/// daughter feature.
#[derive(Debug)]
pub(crate) struct Agreement {
    pub(crate) dim: DimId,
}

impl Principle for Agreement {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Agreement
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let language = context.dimension(self.dim).language;

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            let mother_features: Vec<FeatureId> = attributes
                .iter()
                .flat_map(|attributes| attributes.agree.iter().map(|agree| agree.mother))
                .sorted()
                .dedup()
                .collect();
            let daughter_features: Vec<(Label, FeatureId)> = attributes
                .iter()
                .flat_map(|attributes| {
                    attributes
                        .agree
                        .iter()
                        .map(|agree| (agree.label, agree.daughter))
                })
                .sorted()
                .dedup()
                .collect();
            if mother_features.is_empty() {
                continue;
            }

            let codec = PairCodec::new(daughter_features.len() as u32);
            let sets = attributes
                .iter()
                .map(|attributes| {
                    attributes
                        .agree
                        .iter()
                        .map(|agree| {
                            let mother = index_of(&mother_features, &agree.mother);
                            let daughter =
                                index_of(&daughter_features, &(agree.label, agree.daughter));
                            codec.encode(mother, daughter)
                        })
                        .collect()
                })
                .collect();
            let name = format!("{}[{v}]", context.principle());
            let pairs = context.select_by_entry(language, v, name, sets)?;

            let mains = mother_features
                .iter()
                .map(|&feature| Ok(context.agreement(self.dim, v, feature)?.value))
                .collect::<Result<Vec<_>, ProblemError>>()?;
            let mut seqs = Vec::with_capacity(daughter_features.len());
            for &(label, feature) in &daughter_features {
                let name = format!(
                    "{}:values[{v}][{}]",
                    context.principle(),
                    context.label_name(self.dim, label)
                );
                seqs.push(context.values_of(name, arcs.outs[v][label as usize], self.dim, feature)?);
            }

            context.post(EqualitySelection::new(mains, pairs, seqs))?;
        }
        Ok(())
    }
}

/// For every label of a node's entry with `[feature, value]` requirements, the daughters on the
/// label carry that value.
#[derive(Debug)]
pub(crate) struct Government {
    pub(crate) dim: DimId,
}

impl Principle for Government {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::Government
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let language = context.dimension(self.dim).language;
        let width = context
            .language(self.dim)
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
                        .govern
                        .iter()
                        .map(|govern| (govern.label, govern.feature))
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
                        .govern
                        .iter()
                        .map(|govern| {
                            let seq = index_of(&governed, &(govern.label, govern.feature));
                            codec.encode(seq, govern.value)
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
                    context.label_name(self.dim, label)
                );
                seqs.push(context.values_of(name, arcs.outs[v][label as usize], self.dim, feature)?);
            }

            context.post(SimpleEqualitySelection::new(pairs, seqs, width))?;
        }
        Ok(())
    }
}

/// For every `arcagr` label of a node's entry, the node's value of the feature is the `present`
/// value when the node has a daughter on the label and the `absent` value otherwise.
#[derive(Debug)]
pub(crate) struct ArcAgreement {
    pub(crate) dim: DimId,
}

impl Principle for ArcAgreement {
    fn kind(&self) -> PrincipleKind {
        PrincipleKind::ArcAgreement
    }

    fn dimension(&self) -> DimId {
        self.dim
    }

    fn make_constraints(&self, context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
        let arcs = context.arcs(self.dim);
        let language = context.dimension(self.dim).language;

        for v in 0..context.num_nodes() {
            let attributes = context.attributes(self.dim, v);
            let specs: Vec<(Label, FeatureId)> = attributes
                .iter()
                .flat_map(|attributes| {
                    attributes
                        .arcagr
                        .iter()
                        .map(|(&label, spec)| (label, spec.feature))
                })
                .sorted()
                .dedup()
                .collect();

            for (label, feature) in specs {
                let label_name = context.label_name(self.dim, label);
                let name = format!("{}[{v}][{label_name}]", context.principle());
                let all_values =
                    IntSet::range(0, context.language(self.dim).feature(feature).num_values());
                let value_sets = |present: bool| -> Vec<IntSet> {
                    attributes
                        .iter()
                        .map(|attributes| match attributes.arcagr.get(&label) {
                            Some(spec) if spec.feature == feature => IntSet::singleton(if present {
                                spec.present
                            } else {
                                spec.absent
                            }),
                            _ => all_values.clone(),
                        })
                        .collect()
                };

                let has_daughter = context
                    .model
                    .new_int_var(format!("{name}:has"), IntSet::range(0, 2));
                context.post(LogEquivalence::new(
                    has_daughter,
                    arcs.outs[v][label as usize],
                ))?;

                let absent =
                    context.select_by_entry(language, v, format!("{name}:absent"), value_sets(false))?;
                let present =
                    context.select_by_entry(language, v, format!("{name}:present"), value_sets(true))?;
                let chosen = context
                    .model
                    .new_set_var(format!("{name}:chosen"), IntSet::new(), all_values.clone());
                context.post(IntSelection::new(chosen, has_daughter, vec![absent, present]))?;

                let value = context.agreement(self.dim, v, feature)?.value;
                context.post(IvMemberSv::new(value, chosen))?;
            }
        }
        Ok(())
    }
}

/// The position of `item` in the sorted and deduplicated `items`.
fn index_of<T: Ord>(items: &[T], item: &T) -> u32 {
    items.binary_search(item).unwrap_or_default() as u32
}
