//! The JSON format of a language file.
//!
//! These types mirror the file one to one; names are only resolved when the sources of all
//! languages of a [`Grammar`](crate::Grammar) are compiled together.
mod cardinality;

use std::collections::BTreeMap;
use std::path::Path;

pub use cardinality::Cardinality;
use serde::Deserialize;
use serde::Serialize;

use crate::feature::FeatureValue;
use crate::GrammarError;

/// A language file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageSource {
    pub abbrev: String,
    pub name: String,
    /// The admissible value tuples of every agreement feature; the index of a value is its code.
    #[serde(default)]
    pub features: BTreeMap<String, Vec<FeatureValue>>,
    pub dimensions: Vec<DimensionSource>,
    /// The arc dimension whose node positions determine the word order of generated sentences.
    #[serde(default)]
    pub order_dimension: Option<String>,
    #[serde(default)]
    pub agreement_maps: Vec<AgreementMapSource>,
    /// Lexical entries by surface form; the end-of-sentence entries are stored under `EOS`.
    #[serde(default)]
    pub lexicon: BTreeMap<String, Vec<EntrySource>>,
    #[serde(default)]
    pub morphology: Option<MorphologySource>,
}

impl LanguageSource {
    /// Read a language file, followed by any number of lexicon files whose entries are appended
    /// to the lexicon of the language.
    pub fn read(path: &Path, lexicon_paths: &[&Path]) -> Result<LanguageSource, GrammarError> {
        let mut source: LanguageSource = serde_json::from_str(&read_to_string(path)?)?;
        for &lexicon_path in lexicon_paths {
            let lexicon: BTreeMap<String, Vec<EntrySource>> =
                serde_json::from_str(&read_to_string(lexicon_path)?)?;
            for (form, entries) in lexicon {
                source.lexicon.entry(form).or_default().extend(entries);
            }
        }
        Ok(source)
    }
}

fn read_to_string(path: &Path) -> Result<String, GrammarError> {
    std::fs::read_to_string(path).map_err(|error| GrammarError::io(path, error))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKindSource {
    /// A dimension of labelled arcs between the nodes of one language.
    #[default]
    Arc,
    /// A dimension relating two arc dimensions, possibly of different languages.
    Interface,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionSource {
    pub abbrev: String,
    #[serde(default)]
    pub kind: DimensionKindSource,
    #[serde(default)]
    pub labels: Vec<String>,
    /// For interface dimensions: the related dimensions, as `dim` or `language:dim`.
    #[serde(default)]
    pub dim1: Option<String>,
    #[serde(default)]
    pub dim2: Option<String>,
    #[serde(default)]
    pub principles: Vec<String>,
    #[serde(default)]
    pub semantic: bool,
}

/// Maps the values of a feature of this language to values of a feature of another language.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgreementMapSource {
    pub target_language: String,
    pub source: String,
    pub target: String,
    pub values: Vec<(FeatureValue, Vec<FeatureValue>)>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySource {
    pub name: String,
    #[serde(default)]
    pub id: Option<u32>,
    pub pos: String,
    #[serde(default)]
    pub root: Option<String>,
    /// A literal surface form, used instead of the morphology when generating.
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub dims: BTreeMap<String, AttributesSource>,
    #[serde(default)]
    pub crosslexes: BTreeMap<String, Vec<CrossLexSource>>,
    #[serde(default)]
    pub empty_nodes: Vec<EmptyNodeSource>,
}

/// The attributes of an entry in one dimension. Which keys are meaningful depends on the kind of
/// the dimension.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AttributesSource {
    pub ins: BTreeMap<String, Cardinality>,
    pub outs: BTreeMap<String, Cardinality>,
    pub agrs: BTreeMap<String, Vec<FeatureValue>>,
    /// `[label, mother feature, daughter feature]`
    pub agree: Vec<(String, String, String)>,
    /// label to `[feature, value]` pairs the daughters on the label must carry
    pub govern: BTreeMap<String, Vec<(String, FeatureValue)>>,
    pub arg: BTreeMap<String, Vec<String>>,
    pub argrev: BTreeMap<String, Vec<String>>,
    pub ldend: BTreeMap<String, Vec<String>>,
    #[serde(rename = "mod")]
    pub modifier: BTreeMap<String, Vec<String>>,
    pub lbstart: BTreeMap<String, Vec<String>>,
    pub lbend: BTreeMap<String, Vec<String>>,
    pub laend: BTreeMap<String, Vec<String>>,
    pub lab12s: BTreeMap<String, Vec<String>>,
    pub labs: BTreeMap<String, Vec<String>>,
    /// Label sequences; `^` stands for the node itself.
    pub order: Vec<Vec<String>>,
    pub blocks: Vec<String>,
    pub groupouts: Vec<String>,
    pub gid: Option<u32>,
    pub gheads: Vec<String>,
    pub crossgov: BTreeMap<String, (String, FeatureValue)>,
    pub ordereq: Vec<String>,
    /// label to `[feature, value without daughter, value with daughter]`
    pub arcagr: BTreeMap<String, (String, FeatureValue, FeatureValue)>,
    /// `[dim1 feature, dim2 feature]`
    pub ifagree: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossLexSource {
    pub target: String,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub targdim: Option<String>,
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyNodeSource {
    pub entry: String,
    pub dim: String,
    pub label: String,
}

/// The tables of a [`TableMorphology`](crate::TableMorphology).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MorphologySource {
    pub analyses: BTreeMap<String, Vec<AnalysisSource>>,
    pub forms: Vec<FormSource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSource {
    pub pos: String,
    pub root: String,
    #[serde(default)]
    pub citation: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSource {
    pub pos: String,
    pub root: String,
    /// The agreement values the form realises; features not listed match any value.
    #[serde(default)]
    pub agrs: BTreeMap<String, FeatureValue>,
    pub form: String,
}

#[cfg(test)]
mod tests {
    use super::LanguageSource;
    use crate::format::Cardinality;

    #[test]
    fn minimal_language() {
        let source: LanguageSource = serde_json::from_str(
            r#"{
                "abbrev": "eng", "name": "English",
                "features": { "num": [[0], [1]] },
                "dimensions": [ { "abbrev": "id", "labels": ["root", "sb"], "principles": ["tree"] } ],
                "lexicon": {
                    "dog": [ { "name": "dog_n", "pos": "n",
                               "dims": { "id": { "ins": { "sb": "?" }, "agrs": { "num": [[0]] } } } } ]
                }
            }"#,
        )
        .expect("valid language");

        assert_eq!(source.features["num"], vec![vec![0], vec![1]]);
        let dog = &source.lexicon["dog"][0];
        assert_eq!(dog.dims["id"].ins["sb"], Cardinality::OPTIONAL);
        assert!(dog.crosslexes.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<LanguageSource>(
            r#"{ "abbrev": "eng", "name": "English", "dimensions": [], "grammar": 1 }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn lexicon_files_extend_the_language() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let language = dir.path().join("eng.json");
        let lexicon = dir.path().join("eng-extra.json");
        std::fs::write(
            &language,
            r#"{ "abbrev": "eng", "name": "English", "dimensions": [],
                 "lexicon": { "a": [ { "name": "a1", "pos": "det" } ] } }"#,
        )
        .expect("writable");
        std::fs::write(
            &lexicon,
            r#"{ "a": [ { "name": "a2", "pos": "det" } ], "b": [ { "name": "b", "pos": "n" } ] }"#,
        )
        .expect("writable");

        let source = LanguageSource::read(&language, &[&lexicon]).expect("readable");
        assert_eq!(source.lexicon["a"].len(), 2);
        assert_eq!(source.lexicon["b"][0].name, "b");
    }
}
