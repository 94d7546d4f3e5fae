use std::sync::Arc;

use log::debug;
use log::warn;
use xdg_core::containers::IntSet;
use xdg_grammar::Dimension;
use xdg_grammar::DimensionKind;
use xdg_grammar::DimensionRef;
use xdg_grammar::Grammar;
use xdg_grammar::Label;
use xdg_grammar::LabelSet;
use xdg_grammar::Language;
use xdg_grammar::LexEntry;
use xdg_grammar::Lexicon;

use crate::ProblemError;

/// The surface form under which the end-of-sentence entries of a language are stored.
pub const EOS_FORM: &str = "EOS";

/// The label of the arcs from the end-of-sentence node to the roots of a sentence.
pub const ROOT_LABEL: &str = "root";

/// The label of the arcs from the end-of-sentence node to deleted nodes.
pub const DELETION_LABEL: &str = "del";

/// The index of a dimension within a [`Sentence`].
pub type DimId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Word,
    /// A node introduced by entry `entry` of the source entries of node `trigger`.
    Empty {
        trigger: usize,
        entry: usize,
        dimension: String,
        label: Label,
    },
    Eos,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub index: usize,
    pub form: String,
    /// The candidate entries of the node, per language of the sentence.
    pub entries: Vec<Vec<Arc<LexEntry>>>,
    /// For every target language, the target entries each source entry translates into.
    pub(crate) translations: Vec<Vec<IntSet>>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_eos(&self) -> bool {
        self.kind == NodeKind::Eos
    }
}

/// A dimension taking part in a problem.
#[derive(Clone, Debug)]
pub(crate) struct ProblemDimension<'g> {
    pub(crate) reference: DimensionRef,
    /// The language owning the dimension, as an index into [`Sentence::languages`].
    pub(crate) language: usize,
    pub(crate) dimension: &'g Dimension,
    /// For interface dimensions, the two related arc dimensions.
    pub(crate) related: Option<(DimId, DimId)>,
}

impl ProblemDimension<'_> {
    /// Arc dimensions of target languages are generated rather than parsed.
    pub(crate) fn is_output(&self) -> bool {
        self.language > 0
    }

    pub(crate) fn labels(&self) -> Option<&LabelSet> {
        self.dimension.labels()
    }
}

/// The nodes of a sentence with their candidate entries in every language of a problem. The
/// first language is the source language; the others are targets.
#[derive(Debug)]
pub struct Sentence<'g> {
    pub(crate) grammar: &'g Grammar,
    pub(crate) languages: Vec<&'g Language>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) dimensions: Vec<ProblemDimension<'g>>,
}

impl<'g> Sentence<'g> {
    pub fn assemble(
        grammar: &'g Grammar,
        source: &str,
        targets: &[&str],
        tokens: &[String],
    ) -> Result<Sentence<'g>, ProblemError> {
        let languages = std::iter::once(source)
            .chain(targets.iter().copied())
            .map(|abbrev| grammar.language(abbrev))
            .collect::<Result<Vec<_>, _>>()?;
        let source = languages[0];

        let mut nodes = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            nodes.push(Node {
                index: nodes.len(),
                form: token.clone(),
                entries: vec![source_entries(source, token)?],
                translations: Vec::new(),
                kind: NodeKind::Word,
            });
        }

        let mut empty_nodes = Vec::new();
        for node in &nodes {
            for (entry_index, entry) in node.entries[0].iter().enumerate() {
                for spec in &entry.empty_nodes {
                    let Some(empty_entry) = source.lexicon().entry(&spec.entry) else {
                        continue;
                    };
                    empty_nodes.push(Node {
                        index: nodes.len() + empty_nodes.len(),
                        form: String::new(),
                        entries: vec![vec![Arc::clone(empty_entry)]],
                        translations: Vec::new(),
                        kind: NodeKind::Empty {
                            trigger: node.index,
                            entry: entry_index,
                            dimension: spec.dim.clone(),
                            label: spec.label,
                        },
                    });
                }
            }
        }
        nodes.extend(empty_nodes);

        nodes.push(Node {
            index: nodes.len(),
            form: EOS_FORM.to_owned(),
            entries: vec![source_entries(source, EOS_FORM)?],
            translations: Vec::new(),
            kind: NodeKind::Eos,
        });

        for target in &languages[1..] {
            for node in &mut nodes {
                translate(grammar, source, target, node)?;
            }
        }

        let dimensions = problem_dimensions(&languages);
        debug!(
            "assembled {} nodes over {} dimensions",
            nodes.len(),
            dimensions.len()
        );

        Ok(Sentence {
            grammar,
            languages,
            nodes,
            dimensions,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn languages(&self) -> &[&'g Language] {
        &self.languages
    }

    pub fn eos(&self) -> usize {
        self.nodes.len() - 1
    }

    /// All nodes, as the universe of node sets.
    pub(crate) fn all_nodes(&self) -> IntSet {
        IntSet::range(0, self.nodes.len() as u32)
    }

    pub(crate) fn dimension(&self, reference: &DimensionRef) -> Option<DimId> {
        self.dimensions
            .iter()
            .position(|dimension| dimension.reference == *reference)
    }

    pub(crate) fn entries(&self, language: usize, node: usize) -> &[Arc<LexEntry>] {
        &self.nodes[node].entries[language]
    }

    /// The source text, tokens joined by spaces.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Word)
            .map(|node| node.form.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The entries of `form`, or the entries its morphological analyses lead to.
fn source_entries(language: &Language, form: &str) -> Result<Vec<Arc<LexEntry>>, ProblemError> {
    let entries = language.lexicon().entries(form);
    if !entries.is_empty() {
        return Ok(entries.to_vec());
    }

    let mut analysed = Vec::new();
    if let Some(morphology) = language.morphology() {
        for analysis in morphology.analyze(form) {
            for entry in language
                .lexicon()
                .entries_for_root(&analysis.pos, &analysis.root)
            {
                let mut entry = LexEntry::clone(entry);
                for (feature, value) in &analysis.features {
                    let Some(id) = language.feature_id(feature) else {
                        warn!("analysis of `{form}` has unknown feature `{feature}`");
                        continue;
                    };
                    match language.feature(id).code(value) {
                        Some(code) => entry.override_agreement(id, IntSet::singleton(code)),
                        None => warn!("analysis of `{form}` has unknown value {value:?} for `{feature}`"),
                    }
                }
                analysed.push(Arc::new(entry));
            }
        }
    }

    if analysed.is_empty() {
        return Err(ProblemError::UnknownWord {
            language: language.abbrev().to_owned(),
            word: form.to_owned(),
        });
    }
    Ok(analysed)
}

/// Add the entries of `target` that the source entries of `node` translate into.
fn translate(
    grammar: &Grammar,
    source: &Language,
    target: &Language,
    node: &mut Node,
) -> Result<(), ProblemError> {
    let mut entries: Vec<Arc<LexEntry>> = Vec::new();
    let mut translations = Vec::with_capacity(node.entries[0].len());

    for source_entry in &node.entries[0] {
        let forward = source_entry
            .crosslexes
            .get(target.abbrev())
            .into_iter()
            .flatten()
            .map(|link| link.target.as_str());
        let backward = grammar
            .reverse_crosslexes(source.abbrev(), &source_entry.name)
            .iter()
            .filter(|(language, _)| language == target.abbrev())
            .map(|(_, entry)| entry.as_str());

        let mut reachable = IntSet::new();
        for name in forward.chain(backward) {
            let Some(target_entry) = target.lexicon().entry(name) else {
                continue;
            };
            let index = match entries.iter().position(|entry| entry.name == *name) {
                Some(index) => index,
                None => {
                    entries.push(Arc::clone(target_entry));
                    entries.len() - 1
                }
            };
            let _ = reachable.insert(index as u32);
        }
        translations.push(reachable);
    }

    if entries.is_empty() && node.is_eos() {
        entries = target.lexicon().entries(EOS_FORM).to_vec();
        let all = IntSet::range(0, entries.len() as u32);
        translations.iter_mut().for_each(|reachable| *reachable = all.clone());
    }
    if entries.is_empty() {
        return Err(ProblemError::NoTranslation {
            language: target.abbrev().to_owned(),
            word: node.form.clone(),
        });
    }

    node.entries.push(entries);
    node.translations.push(translations);
    Ok(())
}

/// The dimensions of `languages`; interface dimensions relating a language outside the problem
/// are left out.
fn problem_dimensions<'g>(languages: &[&'g Language]) -> Vec<ProblemDimension<'g>> {
    let mut dimensions: Vec<ProblemDimension<'g>> = languages
        .iter()
        .enumerate()
        .flat_map(|(index, language)| {
            language
                .dimensions()
                .iter()
                .map(move |dimension| ProblemDimension {
                    reference: DimensionRef {
                        language: language.abbrev().to_owned(),
                        dimension: dimension.abbrev.clone(),
                    },
                    language: index,
                    dimension,
                    related: None,
                })
        })
        .collect();

    let position = |dimensions: &[ProblemDimension<'_>], reference: &DimensionRef| {
        dimensions
            .iter()
            .position(|dimension| dimension.reference == *reference)
    };
    let mut index = 0;
    while index < dimensions.len() {
        if let DimensionKind::Interface { dim1, dim2 } = &dimensions[index].dimension.kind {
            match (position(&dimensions, dim1), position(&dimensions, dim2)) {
                (Some(first), Some(second)) => dimensions[index].related = Some((first, second)),
                _ => {
                    debug!(
                        "leaving out interface dimension {}: {dim1} or {dim2} is not part of the problem",
                        dimensions[index].reference
                    );
                    let _ = dimensions.remove(index);
                    continue;
                }
            }
        }
        index += 1;
    }
    dimensions
}
