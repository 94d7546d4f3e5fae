use crate::dimension::Dimension;
use crate::dimension::LabelSet;
use crate::feature::Feature;
use crate::feature::FeatureId;
use crate::lexicon::MapLexicon;
use crate::morphology::CachedMorphology;
use crate::morphology::Morphology;
use crate::morphology::TableMorphology;

/// A language of a [`Grammar`](crate::Grammar): its features, dimensions, lexicon and morphology.
#[derive(Debug)]
pub struct Language {
    pub(crate) abbrev: String,
    pub(crate) name: String,
    pub(crate) features: Vec<Feature>,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) order_dimension: Option<String>,
    pub(crate) lexicon: MapLexicon,
    pub(crate) morphology: Option<CachedMorphology<TableMorphology>>,
}

impl Language {
    pub fn abbrev(&self) -> &str {
        &self.abbrev
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id as usize]
    }

    pub fn feature_id(&self, name: &str) -> Option<FeatureId> {
        self.features
            .iter()
            .position(|feature| feature.name() == name)
            .map(|index| index as FeatureId)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, abbrev: &str) -> Option<&Dimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.abbrev == abbrev)
    }

    /// The labels of the arc dimension `abbrev`.
    pub fn labels(&self, abbrev: &str) -> Option<&LabelSet> {
        self.dimension(abbrev).and_then(Dimension::labels)
    }

    /// The arc dimension whose positions give the word order of generated sentences.
    pub fn order_dimension(&self) -> Option<&str> {
        self.order_dimension.as_deref()
    }

    pub fn lexicon(&self) -> &MapLexicon {
        &self.lexicon
    }

    pub fn morphology(&self) -> Option<&dyn Morphology> {
        let morphology = self.morphology.as_ref()?;
        Some(morphology)
    }
}
