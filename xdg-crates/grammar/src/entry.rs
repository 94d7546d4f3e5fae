use std::collections::BTreeMap;

use xdg_core::containers::IntSet;

use crate::dimension::Label;
use crate::dimension::LinkKind;
use crate::feature::FeatureId;
use crate::format::Cardinality;

/// A lexical entry with every name resolved against the grammar it was loaded into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexEntry {
    /// Unique within its language.
    pub name: String,
    pub id: u32,
    pub pos: String,
    pub root: Option<String>,
    pub word: Option<String>,
    pub(crate) dims: BTreeMap<String, Attributes>,
    /// Translations of the entry, by target language.
    pub crosslexes: BTreeMap<String, Vec<CrossLex>>,
    /// Empty nodes this entry introduces into a sentence.
    pub empty_nodes: Vec<EmptyNodeSpec>,
}

static NO_ATTRIBUTES: Attributes = Attributes::EMPTY;

impl LexEntry {
    /// The attributes of the entry in the dimension `dimension` of its own language; empty when
    /// the entry does not mention the dimension.
    pub fn attributes(&self, dimension: &str) -> &Attributes {
        self.dims.get(dimension).unwrap_or(&NO_ATTRIBUTES)
    }

    /// Replace the agreement values of the entry in every arc dimension that constrains
    /// `feature`, as done for the features found by a morphological analysis.
    pub fn override_agreement(&mut self, feature: FeatureId, values: IntSet) {
        for attributes in self.dims.values_mut() {
            if let Some(current) = attributes.agrs.get_mut(&feature) {
                *current = values.clone();
            }
        }
    }

    pub fn set_attributes(&mut self, dimension: impl Into<String>, attributes: Attributes) {
        let _ = self.dims.insert(dimension.into(), attributes);
    }
}

/// The attributes of an entry in one dimension.
///
/// In an arc dimension labels refer to the dimension itself and features to its language. In an
/// interface dimension `dim1` labels and features belong to the first related dimension, `dim2`
/// ones to the second.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Admissible numbers of incoming arcs per label.
    pub ins: BTreeMap<Label, Cardinality>,
    /// Admissible numbers of outgoing arcs per label.
    pub outs: BTreeMap<Label, Cardinality>,
    /// Admissible value codes per feature; features not mentioned are unconstrained.
    pub agrs: BTreeMap<FeatureId, IntSet>,
    pub agree: Vec<Agree>,
    pub govern: Vec<Govern>,
    /// Per linking relation: dim2 label to the dim1 labels it links to.
    pub links: BTreeMap<LinkKind, BTreeMap<Label, Vec<Label>>>,
    /// Label sequences whose daughters are ordered; the label `labels.len()` stands for the node
    /// itself.
    pub order: Vec<Vec<Label>>,
    /// dim1 in-labels a climbing node may not be blocked on.
    pub blocks: Vec<Label>,
    pub groupouts: Vec<Label>,
    pub gid: Option<u32>,
    pub gheads: Vec<Label>,
    /// dim1 label to the dim2 feature and value code its daughters must carry.
    pub crossgov: BTreeMap<Label, (FeatureId, u32)>,
    /// dim1 labels whose daughters keep their order in dim2.
    pub ordereq: Vec<Label>,
    pub arcagr: BTreeMap<Label, ArcAgreement>,
    /// `(dim1 feature, dim2 feature)` pairs that agree across the interface.
    pub ifagree: Vec<(FeatureId, FeatureId)>,
}

impl Attributes {
    pub const EMPTY: Attributes = Attributes {
        ins: BTreeMap::new(),
        outs: BTreeMap::new(),
        agrs: BTreeMap::new(),
        agree: Vec::new(),
        govern: Vec::new(),
        links: BTreeMap::new(),
        order: Vec::new(),
        blocks: Vec::new(),
        groupouts: Vec::new(),
        gid: None,
        gheads: Vec::new(),
        crossgov: BTreeMap::new(),
        ordereq: Vec::new(),
        arcagr: BTreeMap::new(),
        ifagree: Vec::new(),
    };

    /// The dim2 to dim1 label links of one linking relation.
    pub fn links(&self, kind: LinkKind) -> Option<&BTreeMap<Label, Vec<Label>>> {
        self.links.get(&kind)
    }
}

/// The daughters on `label` must carry the value of `daughter` that the mother has for `mother`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Agree {
    pub label: Label,
    pub mother: FeatureId,
    pub daughter: FeatureId,
}

/// The daughters on `label` must carry `value` for `feature`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Govern {
    pub label: Label,
    pub feature: FeatureId,
    pub value: u32,
}

/// The value of `feature` is `present` when the node has a daughter on the label and `absent`
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArcAgreement {
    pub feature: FeatureId,
    pub absent: u32,
    pub present: u32,
}

/// A link from an entry to an entry of another language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CrossLex {
    /// The name of the target entry.
    pub target: String,
    pub count: u32,
    /// Whether the link also translates from the target back to the source.
    pub bidirectional: bool,
    pub targdim: Option<String>,
}

/// An empty node introduced by an entry: the node gets `entry` as its only entry and, when
/// licensed, hangs below the triggering node on `label` in `dim`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmptyNodeSpec {
    pub entry: String,
    pub dim: String,
    pub label: Label,
}
