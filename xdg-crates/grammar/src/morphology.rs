use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use xdg_core::containers::HashMap;

use crate::feature::FeatureValue;
use crate::format::FormSource;
use crate::format::MorphologySource;

/// One reading of a surface form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Analysis {
    pub pos: String,
    pub root: String,
    pub citation: String,
    /// Agreement values by feature name.
    pub features: BTreeMap<String, FeatureValue>,
}

/// What a surface form is generated from: the entry of a node, its agreement values and the
/// context of the node in the solution.
#[derive(Clone, Copy, Debug)]
pub struct GenerationRequest<'a> {
    pub pos: &'a str,
    pub root: &'a str,
    pub agrs: &'a BTreeMap<String, FeatureValue>,
    pub daughters: &'a [usize],
    pub mothers: &'a [usize],
    /// The forms generated so far, by node.
    pub forms: &'a [String],
    pub del_nodes: &'a [usize],
}

/// Analysis and generation of word forms.
pub trait Morphology {
    fn analyze(&self, form: &str) -> Vec<Analysis>;

    fn generate(&self, request: &GenerationRequest<'_>) -> Option<String>;
}

/// A [`Morphology`] given by explicit tables of analyses and forms.
#[derive(Clone, Debug, Default)]
pub struct TableMorphology {
    analyses: HashMap<String, Vec<Analysis>>,
    forms: Vec<FormSource>,
}

impl TableMorphology {
    pub fn new(source: MorphologySource) -> TableMorphology {
        let analyses = source
            .analyses
            .into_iter()
            .map(|(form, analyses)| {
                let analyses = analyses
                    .into_iter()
                    .map(|analysis| Analysis {
                        citation: analysis.citation.unwrap_or_else(|| analysis.root.clone()),
                        pos: analysis.pos,
                        root: analysis.root,
                        features: analysis.features,
                    })
                    .collect();
                (form, analyses)
            })
            .collect();

        TableMorphology {
            analyses,
            forms: source.forms,
        }
    }
}

impl Morphology for TableMorphology {
    fn analyze(&self, form: &str) -> Vec<Analysis> {
        self.analyses.get(form).cloned().unwrap_or_default()
    }

    /// The form of the row that matches the request on the most features; the first such row on
    /// ties.
    fn generate(&self, request: &GenerationRequest<'_>) -> Option<String> {
        self.forms
            .iter()
            .filter(|row| row.pos == request.pos && row.root == request.root)
            .filter(|row| {
                row.agrs
                    .iter()
                    .all(|(feature, value)| request.agrs.get(feature) == Some(value))
            })
            .min_by_key(|row| Reverse(row.agrs.len()))
            .map(|row| row.form.clone())
    }
}

type GenerationKey = (String, String, BTreeMap<String, FeatureValue>);

/// Memoizes the analyses and generated forms of another [`Morphology`].
///
/// Generated forms are memoized on part of speech, root and agreement values only, so the wrapped
/// morphology should not depend on the rest of the request.
#[derive(Debug, Default)]
pub struct CachedMorphology<M> {
    inner: M,
    analyses: RefCell<HashMap<String, Vec<Analysis>>>,
    generated: RefCell<HashMap<GenerationKey, Option<String>>>,
}

impl<M> CachedMorphology<M> {
    pub fn new(inner: M) -> CachedMorphology<M> {
        CachedMorphology {
            inner,
            analyses: RefCell::default(),
            generated: RefCell::default(),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn num_cached(&self) -> usize {
        self.analyses.borrow().len() + self.generated.borrow().len()
    }
}

impl<M: Morphology> Morphology for CachedMorphology<M> {
    fn analyze(&self, form: &str) -> Vec<Analysis> {
        if let Some(analyses) = self.analyses.borrow().get(form) {
            return analyses.clone();
        }
        let analyses = self.inner.analyze(form);
        let _ = self
            .analyses
            .borrow_mut()
            .insert(form.to_owned(), analyses.clone());
        analyses
    }

    fn generate(&self, request: &GenerationRequest<'_>) -> Option<String> {
        let key = (
            request.pos.to_owned(),
            request.root.to_owned(),
            request.agrs.clone(),
        );
        if let Some(form) = self.generated.borrow().get(&key) {
            return form.clone();
        }
        let form = self.inner.generate(request);
        let _ = self.generated.borrow_mut().insert(key, form.clone());
        form
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::CachedMorphology;
    use super::GenerationRequest;
    use super::Morphology;
    use super::TableMorphology;
    use crate::format::MorphologySource;

    fn morphology() -> TableMorphology {
        let source: MorphologySource = serde_json::from_str(
            r#"{
                "analyses": { "barks": [ { "pos": "v", "root": "bark", "features": { "sbj": [0, 0, 2] } } ] },
                "forms": [
                    { "pos": "v", "root": "bark", "form": "bark" },
                    { "pos": "v", "root": "bark", "agrs": { "sbj": [0, 0, 2] }, "form": "barks" }
                ]
            }"#,
        )
        .expect("valid tables");
        TableMorphology::new(source)
    }

    fn generate(morphology: &impl Morphology, agrs: &BTreeMap<String, Vec<u8>>) -> Option<String> {
        morphology.generate(&GenerationRequest {
            pos: "v",
            root: "bark",
            agrs,
            daughters: &[],
            mothers: &[],
            forms: &[],
            del_nodes: &[],
        })
    }

    #[test]
    fn analyses_default_their_citation_to_the_root() {
        let analyses = morphology().analyze("barks");
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].citation, "bark");
        assert!(morphology().analyze("meows").is_empty());
    }

    #[test]
    fn the_most_specific_form_wins() {
        let third = BTreeMap::from([("sbj".to_owned(), vec![0, 0, 2])]);
        let first = BTreeMap::from([("sbj".to_owned(), vec![0, 0, 0])]);
        assert_eq!(generate(&morphology(), &third).as_deref(), Some("barks"));
        assert_eq!(generate(&morphology(), &first).as_deref(), Some("bark"));
    }

    #[test]
    fn cached_results_are_reused() {
        let cached = CachedMorphology::new(morphology());
        let third = BTreeMap::from([("sbj".to_owned(), vec![0, 0, 2])]);
        assert_eq!(generate(&cached, &third).as_deref(), Some("barks"));
        assert_eq!(generate(&cached, &third).as_deref(), Some("barks"));
        let _ = cached.analyze("barks");
        assert_eq!(cached.num_cached(), 2);
    }
}
