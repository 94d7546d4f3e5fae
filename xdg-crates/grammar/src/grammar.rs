use std::collections::BTreeMap;
use std::mem;

use log::debug;
use log::warn;
use xdg_core::containers::HashMap;
use xdg_core::containers::HashSet;
use xdg_core::containers::IntSet;

use crate::agreement::AgreementMaps;
use crate::dimension::Dimension;
use crate::dimension::DimensionKind;
use crate::dimension::DimensionRef;
use crate::dimension::Label;
use crate::dimension::LabelSet;
use crate::dimension::LinkKind;
use crate::dimension::PrincipleKind;
use crate::entry::Agree;
use crate::entry::ArcAgreement;
use crate::entry::Attributes;
use crate::entry::CrossLex;
use crate::entry::EmptyNodeSpec;
use crate::entry::Govern;
use crate::entry::LexEntry;
use crate::feature::Feature;
use crate::feature::FeatureId;
use crate::format::AgreementMapSource;
use crate::format::AttributesSource;
use crate::format::DimensionKindSource;
use crate::format::DimensionSource;
use crate::format::EntrySource;
use crate::format::LanguageSource;
use crate::language::Language;
use crate::lexicon::MapLexicon;
use crate::morphology::CachedMorphology;
use crate::morphology::TableMorphology;
use crate::GrammarError;

/// The label sequence item that stands for the node itself in an `order` attribute.
pub const NODE_ORDER_ITEM: &str = "^";

/// A set of languages compiled together, so that interface dimensions, cross-lexical links and
/// agreement maps can refer from one language into another.
#[derive(Debug)]
pub struct Grammar {
    languages: Vec<Language>,
    agreement_maps: AgreementMaps,
    /// `(language, entry)` to the `(language, entry)` pairs that link to it bidirectionally.
    reverse_crosslexes: HashMap<(String, String), Vec<(String, String)>>,
}

impl Grammar {
    /// Compile the sources of a set of languages.
    ///
    /// Errors in the structure of a language are fatal. A lexical entry that refers to unknown
    /// labels, features, values or entries, or that has an empty cardinality range, is dropped
    /// with a warning.
    pub fn new(sources: Vec<LanguageSource>) -> Result<Grammar, GrammarError> {
        let mut languages: Vec<Language> = Vec::new();
        let mut pending = Vec::new();

        for source in sources {
            if languages
                .iter()
                .any(|language| language.abbrev == source.abbrev)
            {
                return Err(GrammarError::DuplicateLanguage(source.abbrev));
            }
            let LanguageSource {
                abbrev,
                name,
                features,
                dimensions,
                order_dimension,
                agreement_maps,
                lexicon,
                morphology,
            } = source;

            let features = features
                .into_iter()
                .map(|(name, values)| Feature::new(name, values))
                .collect();
            let dimensions = dimensions
                .into_iter()
                .map(|dimension| compile_dimension(dimension, &abbrev))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(order_dimension) = &order_dimension {
                let is_arc = dimensions
                    .iter()
                    .any(|d: &Dimension| d.abbrev == *order_dimension && !d.is_interface());
                if !is_arc {
                    return Err(GrammarError::UnknownDimension {
                        language: abbrev,
                        dimension: order_dimension.clone(),
                    });
                }
            }

            languages.push(Language {
                abbrev,
                name,
                features,
                dimensions,
                order_dimension,
                lexicon: MapLexicon::default(),
                morphology: morphology.map(|tables| CachedMorphology::new(TableMorphology::new(tables))),
            });
            pending.push((agreement_maps, lexicon));
        }

        check_interfaces(&languages)?;

        let mut agreement_maps = AgreementMaps::default();
        for (language, (maps, _)) in languages.iter().zip(&pending) {
            for map in maps {
                compile_agreement_map(&languages, language, map, &mut agreement_maps)?;
            }
        }

        let mut entries = Vec::with_capacity(languages.len());
        for (language, (_, lexicon)) in languages.iter().zip(pending) {
            let resolver = Resolver {
                languages: &languages,
                language,
            };
            let mut compiled = Vec::new();
            let mut next_id = 0;
            for (form, sources) in lexicon {
                for source in sources {
                    let id = source.id.unwrap_or(next_id);
                    next_id += 1;
                    let name = source.name.clone();
                    match resolver.entry(source, id) {
                        Ok(entry) => compiled.push((form.clone(), entry)),
                        Err(error) => {
                            warn!("dropping entry `{name}` of `{}`: {error}", language.abbrev)
                        }
                    }
                }
            }
            entries.push(compiled);
        }
        drop_dangling_references(&languages, &mut entries);

        let mut reverse_crosslexes: HashMap<_, Vec<_>> = HashMap::default();
        for (language, entries) in languages.iter_mut().zip(entries) {
            for (_, entry) in &entries {
                for (target_language, links) in &entry.crosslexes {
                    for link in links.iter().filter(|link| link.bidirectional) {
                        reverse_crosslexes
                            .entry((target_language.clone(), link.target.clone()))
                            .or_default()
                            .push((language.abbrev.clone(), entry.name.clone()));
                    }
                }
            }
            language.lexicon = MapLexicon::new(entries);
            debug!(
                "compiled language `{}` with {} entries",
                language.abbrev,
                language.lexicon.len()
            );
        }

        Ok(Grammar {
            languages,
            agreement_maps,
            reverse_crosslexes,
        })
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn language(&self, abbrev: &str) -> Result<&Language, GrammarError> {
        find_language(&self.languages, abbrev)
    }

    pub fn dimension(&self, dimension: &DimensionRef) -> Result<&Dimension, GrammarError> {
        self.language(&dimension.language)?
            .dimension(&dimension.dimension)
            .ok_or_else(|| unknown_dimension(dimension))
    }

    pub fn agreement_maps(&self) -> &AgreementMaps {
        &self.agreement_maps
    }

    /// The entries of other languages that declare a bidirectional link to `entry` of `language`.
    pub fn reverse_crosslexes(&self, language: &str, entry: &str) -> &[(String, String)] {
        self.reverse_crosslexes
            .get(&(language.to_owned(), entry.to_owned()))
            .map_or(&[], Vec::as_slice)
    }
}

fn find_language<'a>(languages: &'a [Language], abbrev: &str) -> Result<&'a Language, GrammarError> {
    languages
        .iter()
        .find(|language| language.abbrev == abbrev)
        .ok_or_else(|| GrammarError::UnknownLanguage(abbrev.to_owned()))
}

fn unknown_dimension(dimension: &DimensionRef) -> GrammarError {
    GrammarError::UnknownDimension {
        language: dimension.language.clone(),
        dimension: dimension.dimension.clone(),
    }
}

/// The labels of the arc dimension `dimension`.
fn arc_labels<'a>(
    languages: &'a [Language],
    dimension: &DimensionRef,
) -> Result<&'a LabelSet, GrammarError> {
    find_language(languages, &dimension.language)?
        .labels(&dimension.dimension)
        .ok_or_else(|| unknown_dimension(dimension))
}

fn compile_dimension(source: DimensionSource, language: &str) -> Result<Dimension, GrammarError> {
    let principles = source
        .principles
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<PrincipleKind>, _>>()?;

    let kind = match source.kind {
        DimensionKindSource::Arc => DimensionKind::Arc {
            labels: LabelSet::new(source.labels),
        },
        DimensionKindSource::Interface => {
            let (Some(dim1), Some(dim2)) = (&source.dim1, &source.dim2) else {
                return Err(GrammarError::IncompleteInterface(source.abbrev));
            };
            DimensionKind::Interface {
                dim1: DimensionRef::parse(dim1, language),
                dim2: DimensionRef::parse(dim2, language),
            }
        }
    };

    let is_interface = matches!(kind, DimensionKind::Interface { .. });
    if let Some(principle) = principles
        .iter()
        .find(|principle| principle.is_interface() != is_interface)
    {
        return Err(GrammarError::MisplacedPrinciple {
            principle: principle.name().to_owned(),
            kind: if is_interface { "interface" } else { "arc" },
            dimension: source.abbrev,
        });
    }

    Ok(Dimension {
        abbrev: source.abbrev,
        kind,
        principles,
        semantic: source.semantic,
    })
}

fn check_interfaces(languages: &[Language]) -> Result<(), GrammarError> {
    for language in languages {
        for dimension in &language.dimensions {
            if let DimensionKind::Interface { dim1, dim2 } = &dimension.kind {
                let _ = arc_labels(languages, dim1)?;
                let _ = arc_labels(languages, dim2)?;
            }
        }
    }
    Ok(())
}

fn compile_agreement_map(
    languages: &[Language],
    language: &Language,
    source: &AgreementMapSource,
    maps: &mut AgreementMaps,
) -> Result<(), GrammarError> {
    let target_language = find_language(languages, &source.target_language)?;
    let source_feature = feature_id(language, &source.source)?;
    let target_feature = feature_id(target_language, &source.target)?;

    let mut forward = vec![IntSet::new(); language.feature(source_feature).values().len()];
    for (value, targets) in &source.values {
        let code = value_code(language, source_feature, value)?;
        for target in targets {
            let _ = forward[code as usize].insert(value_code(
                target_language,
                target_feature,
                target,
            )?);
        }
    }

    maps.insert(
        (language.abbrev.clone(), source_feature),
        (target_language.abbrev.clone(), target_feature),
        forward,
        target_language.feature(target_feature).num_values(),
    );
    Ok(())
}

fn feature_id(language: &Language, name: &str) -> Result<FeatureId, GrammarError> {
    language
        .feature_id(name)
        .ok_or_else(|| GrammarError::UnknownFeature {
            language: language.abbrev.clone(),
            feature: name.to_owned(),
        })
}

fn value_code(language: &Language, feature: FeatureId, value: &[u8]) -> Result<u32, GrammarError> {
    let feature = language.feature(feature);
    feature
        .code(value)
        .ok_or_else(|| GrammarError::UnknownFeatureValue {
            feature: feature.name().to_owned(),
            value: value.to_vec(),
        })
}

fn label(labels: &LabelSet, dimension: &DimensionRef, name: &str) -> Result<Label, GrammarError> {
    labels.get(name).ok_or_else(|| GrammarError::UnknownLabel {
        dimension: dimension.to_string(),
        label: name.to_owned(),
    })
}

fn labels<'n>(
    labels_of: &LabelSet,
    dimension: &DimensionRef,
    names: impl IntoIterator<Item = &'n String>,
) -> Result<Vec<Label>, GrammarError> {
    names
        .into_iter()
        .map(|name| label(labels_of, dimension, name))
        .collect()
}

/// Resolves the names in the entries of one language.
struct Resolver<'a> {
    languages: &'a [Language],
    language: &'a Language,
}

impl Resolver<'_> {
    fn entry(&self, source: EntrySource, id: u32) -> Result<LexEntry, GrammarError> {
        let mut dims = BTreeMap::new();
        for (abbrev, attributes) in source.dims {
            let reference = DimensionRef {
                language: self.language.abbrev.clone(),
                dimension: abbrev.clone(),
            };
            let dimension = self
                .language
                .dimension(&abbrev)
                .ok_or_else(|| unknown_dimension(&reference))?;
            let compiled = match &dimension.kind {
                DimensionKind::Arc { labels } => {
                    self.arc_attributes(&reference, labels, attributes)?
                }
                DimensionKind::Interface { dim1, dim2 } => {
                    self.interface_attributes(&reference, dim1, dim2, attributes)?
                }
            };
            let _ = dims.insert(abbrev, compiled);
        }

        let empty_nodes = source
            .empty_nodes
            .into_iter()
            .map(|spec| {
                let reference = DimensionRef {
                    language: self.language.abbrev.clone(),
                    dimension: spec.dim.clone(),
                };
                let labels = arc_labels(self.languages, &reference)?;
                Ok(EmptyNodeSpec {
                    label: label(labels, &reference, &spec.label)?,
                    entry: spec.entry,
                    dim: spec.dim,
                })
            })
            .collect::<Result<Vec<_>, GrammarError>>()?;

        let crosslexes = source
            .crosslexes
            .into_iter()
            .map(|(language, links)| {
                let links = links
                    .into_iter()
                    .map(|link| CrossLex {
                        target: link.target,
                        count: link.count,
                        bidirectional: link.bidirectional,
                        targdim: link.targdim,
                    })
                    .collect();
                (language, links)
            })
            .collect();

        Ok(LexEntry {
            name: source.name,
            id,
            pos: source.pos,
            root: source.root,
            word: source.word,
            dims,
            crosslexes,
            empty_nodes,
        })
    }

    fn arc_attributes(
        &self,
        dimension: &DimensionRef,
        labels_of: &LabelSet,
        source: AttributesSource,
    ) -> Result<Attributes, GrammarError> {
        if let Some(attribute) = first_present(&interface_keys(&source)) {
            return Err(GrammarError::MisplacedAttribute {
                attribute,
                kind: "arc",
                dimension: dimension.to_string(),
            });
        }
        let language = self.language;
        let mut attributes = Attributes::default();

        for (ins, target) in [
            (source.ins, &mut attributes.ins),
            (source.outs, &mut attributes.outs),
        ] {
            for (name, cardinality) in ins {
                if cardinality.is_empty() {
                    return Err(GrammarError::InvalidCardinality(format!(
                        "{name}: {cardinality}"
                    )));
                }
                let _ = target.insert(label(labels_of, dimension, &name)?, cardinality);
            }
        }

        for (feature, values) in &source.agrs {
            let feature = feature_id(language, feature)?;
            let codes = values
                .iter()
                .map(|value| value_code(language, feature, value))
                .collect::<Result<IntSet, _>>()?;
            let _ = attributes.agrs.insert(feature, codes);
        }

        for (name, mother, daughter) in &source.agree {
            attributes.agree.push(Agree {
                label: label(labels_of, dimension, name)?,
                mother: feature_id(language, mother)?,
                daughter: feature_id(language, daughter)?,
            });
        }

        for (name, requirements) in &source.govern {
            let governed = label(labels_of, dimension, name)?;
            for (feature, value) in requirements {
                let feature = feature_id(language, feature)?;
                attributes.govern.push(Govern {
                    label: governed,
                    feature,
                    value: value_code(language, feature, value)?,
                });
            }
        }

        for sequence in &source.order {
            let sequence = sequence
                .iter()
                .map(|name| {
                    if name == NODE_ORDER_ITEM {
                        Ok(labels_of.len())
                    } else {
                        label(labels_of, dimension, name)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            attributes.order.push(sequence);
        }

        attributes.groupouts = labels(labels_of, dimension, &source.groupouts)?;
        attributes.gheads = labels(labels_of, dimension, &source.gheads)?;
        attributes.gid = source.gid;

        for (name, (feature, absent, present)) in &source.arcagr {
            let feature = feature_id(language, feature)?;
            let _ = attributes.arcagr.insert(
                label(labels_of, dimension, name)?,
                ArcAgreement {
                    feature,
                    absent: value_code(language, feature, absent)?,
                    present: value_code(language, feature, present)?,
                },
            );
        }

        Ok(attributes)
    }

    fn interface_attributes(
        &self,
        dimension: &DimensionRef,
        dim1: &DimensionRef,
        dim2: &DimensionRef,
        mut source: AttributesSource,
    ) -> Result<Attributes, GrammarError> {
        if let Some(attribute) = first_present(&arc_keys(&source)) {
            return Err(GrammarError::MisplacedAttribute {
                attribute,
                kind: "interface",
                dimension: dimension.to_string(),
            });
        }
        let labels1 = arc_labels(self.languages, dim1)?;
        let labels2 = arc_labels(self.languages, dim2)?;
        let language1 = find_language(self.languages, &dim1.language)?;
        let language2 = find_language(self.languages, &dim2.language)?;
        let mut attributes = Attributes::default();

        for kind in LinkKind::ALL {
            let links = take_links(&mut source, kind);
            if links.is_empty() {
                continue;
            }
            let mut compiled = BTreeMap::new();
            for (label2, labels1_of) in &links {
                let _ = compiled.insert(
                    label(labels2, dim2, label2)?,
                    labels(labels1, dim1, labels1_of)?,
                );
            }
            let _ = attributes.links.insert(kind, compiled);
        }

        attributes.blocks = labels(labels1, dim1, &source.blocks)?;
        attributes.ordereq = labels(labels1, dim1, &source.ordereq)?;

        for (name, (feature, value)) in &source.crossgov {
            let feature = feature_id(language2, feature)?;
            let _ = attributes.crossgov.insert(
                label(labels1, dim1, name)?,
                (feature, value_code(language2, feature, value)?),
            );
        }

        for (feature1, feature2) in &source.ifagree {
            attributes
                .ifagree
                .push((feature_id(language1, feature1)?, feature_id(language2, feature2)?));
        }

        Ok(attributes)
    }
}

fn take_links(source: &mut AttributesSource, kind: LinkKind) -> BTreeMap<String, Vec<String>> {
    mem::take(match kind {
        LinkKind::End => &mut source.arg,
        LinkKind::Mother => &mut source.argrev,
        LinkKind::DaughterEnd => &mut source.ldend,
        LinkKind::Mod => &mut source.modifier,
        LinkKind::BelowStart => &mut source.lbstart,
        LinkKind::BelowEnd => &mut source.lbend,
        LinkKind::AboveEnd => &mut source.laend,
        LinkKind::AboveBelow1or2Start => &mut source.lab12s,
        LinkKind::AboveBelowStart => &mut source.labs,
    })
}

fn first_present(keys: &[(&'static str, bool)]) -> Option<&'static str> {
    keys.iter()
        .find(|(_, present)| *present)
        .map(|(name, _)| *name)
}

fn arc_keys(source: &AttributesSource) -> [(&'static str, bool); 10] {
    [
        ("ins", !source.ins.is_empty()),
        ("outs", !source.outs.is_empty()),
        ("agrs", !source.agrs.is_empty()),
        ("agree", !source.agree.is_empty()),
        ("govern", !source.govern.is_empty()),
        ("order", !source.order.is_empty()),
        ("groupouts", !source.groupouts.is_empty()),
        ("gid", source.gid.is_some()),
        ("gheads", !source.gheads.is_empty()),
        ("arcagr", !source.arcagr.is_empty()),
    ]
}

fn interface_keys(source: &AttributesSource) -> [(&'static str, bool); 13] {
    [
        ("arg", !source.arg.is_empty()),
        ("argrev", !source.argrev.is_empty()),
        ("ldend", !source.ldend.is_empty()),
        ("mod", !source.modifier.is_empty()),
        ("lbstart", !source.lbstart.is_empty()),
        ("lbend", !source.lbend.is_empty()),
        ("laend", !source.laend.is_empty()),
        ("lab12s", !source.lab12s.is_empty()),
        ("labs", !source.labs.is_empty()),
        ("blocks", !source.blocks.is_empty()),
        ("crossgov", !source.crossgov.is_empty()),
        ("ordereq", !source.ordereq.is_empty()),
        ("ifagree", !source.ifagree.is_empty()),
    ]
}

/// Drop entries whose cross-lexical links or empty nodes name entries that do not exist, until no
/// such entry is left.
fn drop_dangling_references(languages: &[Language], entries: &mut [Vec<(String, LexEntry)>]) {
    loop {
        let names: Vec<HashSet<String>> = entries
            .iter()
            .map(|entries| entries.iter().map(|(_, entry)| entry.name.clone()).collect())
            .collect();

        let mut dropped = false;
        for (index, language_entries) in entries.iter_mut().enumerate() {
            language_entries.retain(|(_, entry)| {
                match dangling_reference(languages, &names, index, entry) {
                    Some(error) => {
                        warn!(
                            "dropping entry `{}` of `{}`: {error}",
                            entry.name, languages[index].abbrev
                        );
                        dropped = true;
                        false
                    }
                    None => true,
                }
            });
        }
        if !dropped {
            break;
        }
    }
}

fn dangling_reference(
    languages: &[Language],
    names: &[HashSet<String>],
    index: usize,
    entry: &LexEntry,
) -> Option<GrammarError> {
    for (target_language, links) in &entry.crosslexes {
        let Some(target) = languages
            .iter()
            .position(|language| language.abbrev == *target_language)
        else {
            return Some(GrammarError::UnknownLanguage(target_language.clone()));
        };
        for link in links {
            if !names[target].contains(&link.target) {
                return Some(GrammarError::UnknownEntry {
                    language: target_language.clone(),
                    entry: link.target.clone(),
                });
            }
            if let Some(targdim) = &link.targdim {
                if languages[target].dimension(targdim).is_none() {
                    return Some(GrammarError::UnknownDimension {
                        language: target_language.clone(),
                        dimension: targdim.clone(),
                    });
                }
            }
        }
    }
    entry
        .empty_nodes
        .iter()
        .find(|spec| !names[index].contains(&spec.entry))
        .map(|spec| GrammarError::UnknownEntry {
            language: languages[index].abbrev.clone(),
            entry: spec.entry.clone(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use xdg_core::containers::IntSet;

    use super::Grammar;
    use crate::format::AnalysisSource;
    use crate::format::Cardinality;
    use crate::format::LanguageSource;
    use crate::format::MorphologySource;
    use crate::GrammarError;
    use crate::Lexicon;

    fn source(json: &str) -> LanguageSource {
        serde_json::from_str(json).expect("valid language source")
    }

    fn english() -> LanguageSource {
        source(
            r#"{
                "abbrev": "eng", "name": "English",
                "features": { "num": [[0], [1]] },
                "dimensions": [
                    { "abbrev": "id", "labels": ["root", "del", "sb", "det"],
                      "principles": ["tree", "valency", "agreement"] }
                ],
                "order_dimension": "id",
                "lexicon": {
                    "dog": [ { "name": "dog", "pos": "n",
                               "dims": { "id": { "ins": { "sb": "?" }, "outs": { "det": "!" },
                                                 "agrs": { "num": [[0]] } } },
                               "crosslexes": { "amh": [ { "target": "wusha" } ] } } ],
                    "dogs": [ { "name": "dogs", "pos": "n",
                                "dims": { "id": { "ins": { "obj": "?" } } } } ],
                    "cat": [ { "name": "cat", "pos": "n",
                               "dims": { "id": { "outs": { "det": [2, 1] } } } } ],
                    "mouse": [ { "name": "mouse", "pos": "n",
                                 "crosslexes": { "amh": [ { "target": "aychit" } ] } } ],
                    "the": [ { "name": "the", "pos": "det",
                               "dims": { "id": { "ins": { "det": "!" }, "agrs": { "num": [[0], [1]] },
                                                 "order": [["det", "^"]] } } } ]
                }
            }"#,
        )
    }

    fn amharic() -> LanguageSource {
        source(
            r#"{
                "abbrev": "amh", "name": "Amharic",
                "features": { "num": [[0], [1], [2]] },
                "dimensions": [ { "abbrev": "id", "labels": ["root", "sb"], "principles": ["tree"] } ],
                "agreement_maps": [ { "target_language": "eng", "source": "num", "target": "num",
                                      "values": [ [[0], [[0]]], [[1], [[1]]], [[2], [[1]]] ] } ],
                "lexicon": {
                    "wusha": [ { "name": "wusha", "pos": "n",
                                 "crosslexes": { "eng": [ { "target": "dog", "bidirectional": true } ] } } ]
                }
            }"#,
        )
    }

    #[test]
    fn entries_are_resolved_against_their_dimensions() {
        let grammar = Grammar::new(vec![english(), amharic()]).expect("valid grammar");
        let english = grammar.language("eng").expect("loaded");

        let dog = &english.lexicon().entries("dog")[0];
        let attributes = dog.attributes("id");
        assert_eq!(attributes.ins.get(&2), Some(&Cardinality::OPTIONAL));
        assert_eq!(attributes.outs.get(&3), Some(&Cardinality::ONE));
        assert_eq!(attributes.agrs.get(&0), Some(&IntSet::from([0])));

        let the = &english.lexicon().entries("the")[0];
        assert_eq!(the.attributes("id").order, vec![vec![3, 4]]);
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let grammar = Grammar::new(vec![english(), amharic()]).expect("valid grammar");
        let english = grammar.language("eng").expect("loaded");

        // unknown label, inverted range and dangling cross-lexical link
        assert!(english.lexicon().entries("dogs").is_empty());
        assert!(english.lexicon().entries("cat").is_empty());
        assert!(english.lexicon().entries("mouse").is_empty());
        assert_eq!(english.lexicon().len(), 2);
    }

    #[test]
    fn links_to_dropped_entries_drop_the_linking_entry() {
        let mut amharic = amharic();
        amharic.lexicon.get_mut("wusha").expect("present")[0]
            .crosslexes
            .get_mut("eng")
            .expect("present")[0]
            .target = "dogs".to_owned();

        let grammar = Grammar::new(vec![english(), amharic]).expect("valid grammar");
        let amharic = grammar.language("amh").expect("loaded");
        assert!(amharic.lexicon().is_empty());
        // `dog` linked to `wusha`, which is gone now
        assert!(grammar.language("eng").expect("loaded").lexicon().entries("dog").is_empty());
    }

    #[test]
    fn a_language_exposes_its_morphology_tables() {
        let mut english = english();
        english.morphology = Some(MorphologySource {
            analyses: BTreeMap::from([(
                "dogs".to_owned(),
                vec![AnalysisSource {
                    pos: "n".to_owned(),
                    root: "dog".to_owned(),
                    citation: None,
                    features: BTreeMap::from([("num".to_owned(), vec![1])]),
                }],
            )]),
            forms: Vec::new(),
        });

        let grammar = Grammar::new(vec![english, amharic()]).expect("valid grammar");
        assert!(grammar.language("amh").expect("loaded").morphology().is_none());
        let analyses = grammar
            .language("eng")
            .expect("loaded")
            .morphology()
            .expect("morphology of the language")
            .analyze("dogs");
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].citation, "dog");
    }

    #[test]
    fn agreement_maps_and_bidirectional_links_are_indexed_both_ways() {
        let grammar = Grammar::new(vec![english(), amharic()]).expect("valid grammar");

        let to_english = grammar
            .agreement_maps()
            .get(("amh", 0), ("eng", 0))
            .expect("declared map");
        assert_eq!(to_english[2], IntSet::from([1]));
        let to_amharic = grammar
            .agreement_maps()
            .get(("eng", 0), ("amh", 0))
            .expect("reversed map");
        assert_eq!(to_amharic[1], IntSet::from([1, 2]));

        assert_eq!(
            grammar.reverse_crosslexes("eng", "dog"),
            &[("amh".to_owned(), "wusha".to_owned())]
        );
    }

    #[test]
    fn structural_errors_are_fatal() {
        let mut unknown_principle = english();
        unknown_principle.dimensions[0].principles.push("planarity".to_owned());
        assert!(matches!(
            Grammar::new(vec![unknown_principle]),
            Err(GrammarError::UnknownPrinciple(_))
        ));

        let mut misplaced = english();
        misplaced.dimensions[0].principles.push("linking_end".to_owned());
        assert!(matches!(
            Grammar::new(vec![misplaced]),
            Err(GrammarError::MisplacedPrinciple { .. })
        ));

        assert!(matches!(
            Grammar::new(vec![amharic()]),
            Err(GrammarError::UnknownLanguage(_))
        ));

        assert!(matches!(
            Grammar::new(vec![english(), english()]),
            Err(GrammarError::DuplicateLanguage(_))
        ));
    }

    #[test]
    fn interface_dimensions_must_relate_arc_dimensions() {
        let mut english = english();
        english.dimensions.push(
            serde_json::from_str(
                r#"{ "abbrev": "idlp", "kind": "interface", "dim1": "id", "dim2": "lp",
                     "principles": ["climbing"] }"#,
            )
            .expect("valid dimension"),
        );
        assert!(matches!(
            Grammar::new(vec![english]),
            Err(GrammarError::UnknownDimension { .. })
        ));
    }
}
