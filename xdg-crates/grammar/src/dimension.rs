use std::fmt::Display;
use std::str::FromStr;

use crate::GrammarError;

/// The position of an arc label within its dimension.
pub type Label = u32;

/// The arc labels of a dimension, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    pub fn new(names: Vec<String>) -> LabelSet {
        LabelSet { names }
    }

    pub fn len(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Label> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| index as Label)
    }

    pub fn name(&self, label: Label) -> &str {
        &self.names[label as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        0..self.len()
    }
}

/// A dimension of one language, named from anywhere in a grammar as `language:dimension`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionRef {
    pub language: String,
    pub dimension: String,
}

impl DimensionRef {
    /// Parse `dim` or `language:dim`; the language defaults to `language`.
    pub fn parse(text: &str, language: &str) -> DimensionRef {
        match text.split_once(':') {
            Some((language, dimension)) => DimensionRef {
                language: language.to_owned(),
                dimension: dimension.to_owned(),
            },
            None => DimensionRef {
                language: language.to_owned(),
                dimension: text.to_owned(),
            },
        }
    }
}

impl Display for DimensionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.language, self.dimension)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DimensionKind {
    Arc {
        labels: LabelSet,
    },
    Interface {
        dim1: DimensionRef,
        dim2: DimensionRef,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dimension {
    pub abbrev: String,
    pub kind: DimensionKind,
    pub principles: Vec<PrincipleKind>,
    /// Whether the graph of the dimension is dumped as the meaning of a sentence.
    pub semantic: bool,
}

impl Dimension {
    /// The labels of an arc dimension; interface dimensions have none.
    pub fn labels(&self) -> Option<&LabelSet> {
        match &self.kind {
            DimensionKind::Arc { labels } => Some(labels),
            DimensionKind::Interface { .. } => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, DimensionKind::Interface { .. })
    }

    pub fn has_principle(&self, principle: PrincipleKind) -> bool {
        self.principles.contains(&principle)
    }
}

/// The principles a dimension can be subject to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrincipleKind {
    Graph,
    Tree,
    Dag,
    Forest,
    DagDisjDaugh,
    Valency,
    Order,
    Projectivity,
    Agr,
    Agreement,
    Government,
    ArcAgreement,
    Group,
    EmptyNode,
    ComplexEmptyNode,
    IfAgreement,
    CrossGovernment,
    CrossOrderEq,
    LinkingEnd,
    LinkingMother,
    LinkingDaughterEnd,
    LinkingMod,
    LinkingBelowStart,
    LinkingBelowEnd,
    LinkingAboveEnd,
    LinkingAboveBelow1or2Start,
    LinkingAboveBelowStart,
    Climbing,
    Barriers,
}

impl PrincipleKind {
    const NAMES: [(&'static str, PrincipleKind); 29] = [
        ("graph", PrincipleKind::Graph),
        ("tree", PrincipleKind::Tree),
        ("dag", PrincipleKind::Dag),
        ("forest", PrincipleKind::Forest),
        ("dag_disj_daugh", PrincipleKind::DagDisjDaugh),
        ("valency", PrincipleKind::Valency),
        ("order", PrincipleKind::Order),
        ("projectivity", PrincipleKind::Projectivity),
        ("agr", PrincipleKind::Agr),
        ("agreement", PrincipleKind::Agreement),
        ("government", PrincipleKind::Government),
        ("arc_agreement", PrincipleKind::ArcAgreement),
        ("group", PrincipleKind::Group),
        ("empty_node", PrincipleKind::EmptyNode),
        ("complex_empty_node", PrincipleKind::ComplexEmptyNode),
        ("if_agreement", PrincipleKind::IfAgreement),
        ("cross_government", PrincipleKind::CrossGovernment),
        ("cross_order_eq", PrincipleKind::CrossOrderEq),
        ("linking_end", PrincipleKind::LinkingEnd),
        ("linking_mother", PrincipleKind::LinkingMother),
        ("linking_daughter_end", PrincipleKind::LinkingDaughterEnd),
        ("linking_mod", PrincipleKind::LinkingMod),
        ("linking_below_start", PrincipleKind::LinkingBelowStart),
        ("linking_below_end", PrincipleKind::LinkingBelowEnd),
        ("linking_above_end", PrincipleKind::LinkingAboveEnd),
        (
            "linking_above_below1or2_start",
            PrincipleKind::LinkingAboveBelow1or2Start,
        ),
        ("linking_above_below_start", PrincipleKind::LinkingAboveBelowStart),
        ("climbing", PrincipleKind::Climbing),
        ("barriers", PrincipleKind::Barriers),
    ];

    pub fn name(self) -> &'static str {
        PrincipleKind::NAMES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("?", |(name, _)| name)
    }

    /// Whether the principle relates two dimensions and so belongs on an interface dimension.
    pub fn is_interface(self) -> bool {
        matches!(
            self,
            PrincipleKind::IfAgreement
                | PrincipleKind::CrossGovernment
                | PrincipleKind::CrossOrderEq
                | PrincipleKind::Climbing
                | PrincipleKind::Barriers
        ) || self.link_kind().is_some()
    }

    /// Whether the principle fixes the shape of the graph of its dimension.
    pub fn is_graph(self) -> bool {
        matches!(
            self,
            PrincipleKind::Graph
                | PrincipleKind::Tree
                | PrincipleKind::Dag
                | PrincipleKind::Forest
                | PrincipleKind::DagDisjDaugh
        )
    }

    pub fn link_kind(self) -> Option<LinkKind> {
        match self {
            PrincipleKind::LinkingEnd => Some(LinkKind::End),
            PrincipleKind::LinkingMother => Some(LinkKind::Mother),
            PrincipleKind::LinkingDaughterEnd => Some(LinkKind::DaughterEnd),
            PrincipleKind::LinkingMod => Some(LinkKind::Mod),
            PrincipleKind::LinkingBelowStart => Some(LinkKind::BelowStart),
            PrincipleKind::LinkingBelowEnd => Some(LinkKind::BelowEnd),
            PrincipleKind::LinkingAboveEnd => Some(LinkKind::AboveEnd),
            PrincipleKind::LinkingAboveBelow1or2Start => Some(LinkKind::AboveBelow1or2Start),
            PrincipleKind::LinkingAboveBelowStart => Some(LinkKind::AboveBelowStart),
            _ => None,
        }
    }
}

impl FromStr for PrincipleKind {
    type Err = GrammarError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PrincipleKind::NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| GrammarError::UnknownPrinciple(name.to_owned()))
    }
}

impl Display for PrincipleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The linking relations between the arcs of two dimensions, one per linking attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
    /// `arg`
    End,
    /// `argrev`
    Mother,
    /// `ldend`
    DaughterEnd,
    /// `mod`
    Mod,
    /// `lbstart`
    BelowStart,
    /// `lbend`
    BelowEnd,
    /// `laend`
    AboveEnd,
    /// `lab12s`
    AboveBelow1or2Start,
    /// `labs`
    AboveBelowStart,
}

impl LinkKind {
    pub const ALL: [LinkKind; 9] = [
        LinkKind::End,
        LinkKind::Mother,
        LinkKind::DaughterEnd,
        LinkKind::Mod,
        LinkKind::BelowStart,
        LinkKind::BelowEnd,
        LinkKind::AboveEnd,
        LinkKind::AboveBelow1or2Start,
        LinkKind::AboveBelowStart,
    ];

    /// The entry attribute the linking relation is read from.
    pub fn attribute(self) -> &'static str {
        match self {
            LinkKind::End => "arg",
            LinkKind::Mother => "argrev",
            LinkKind::DaughterEnd => "ldend",
            LinkKind::Mod => "mod",
            LinkKind::BelowStart => "lbstart",
            LinkKind::BelowEnd => "lbend",
            LinkKind::AboveEnd => "laend",
            LinkKind::AboveBelow1or2Start => "lab12s",
            LinkKind::AboveBelowStart => "labs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DimensionRef;
    use super::LinkKind;
    use super::PrincipleKind;

    #[test]
    fn principle_names_round_trip() {
        for (name, kind) in PrincipleKind::NAMES {
            assert_eq!(name.parse::<PrincipleKind>().expect("known name"), kind);
            assert_eq!(kind.name(), name);
        }
        assert!("projective".parse::<PrincipleKind>().is_err());
    }

    #[test]
    fn linking_principles_are_interface_principles() {
        assert!(PrincipleKind::LinkingEnd.is_interface());
        assert_eq!(PrincipleKind::LinkingMod.link_kind(), Some(LinkKind::Mod));
        assert!(!PrincipleKind::Valency.is_interface());
        assert!(PrincipleKind::Forest.is_graph());
    }

    #[test]
    fn dimension_references_default_to_the_own_language() {
        assert_eq!(DimensionRef::parse("id", "eng").to_string(), "eng:id");
        assert_eq!(DimensionRef::parse("amh:lp", "eng").to_string(), "amh:lp");
    }
}
