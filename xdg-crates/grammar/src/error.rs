use std::path::PathBuf;

use thiserror::Error;

use crate::feature::FeatureValue;

/// Errors raised while reading, validating or caching a grammar.
///
/// Errors in the structure of a language (its dimensions, principles and agreement maps) are
/// fatal. The same errors inside a single lexical entry only drop that entry.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed grammar: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown language `{0}`")]
    UnknownLanguage(String),
    #[error("language `{0}` is defined more than once")]
    DuplicateLanguage(String),
    #[error("language `{language}` has no dimension `{dimension}`")]
    UnknownDimension { language: String, dimension: String },
    #[error("dimension `{dimension}` has no label `{label}`")]
    UnknownLabel { dimension: String, label: String },
    #[error("language `{language}` has no feature `{feature}`")]
    UnknownFeature { language: String, feature: String },
    #[error("feature `{feature}` has no value {value:?}")]
    UnknownFeatureValue { feature: String, value: FeatureValue },
    #[error("language `{language}` has no entry `{entry}`")]
    UnknownEntry { language: String, entry: String },
    #[error("unknown principle `{0}`")]
    UnknownPrinciple(String),
    #[error("principle `{principle}` cannot be used on the {kind} dimension `{dimension}`")]
    MisplacedPrinciple {
        principle: String,
        kind: &'static str,
        dimension: String,
    },
    #[error("attribute `{attribute}` cannot be used on the {kind} dimension `{dimension}`")]
    MisplacedAttribute {
        attribute: &'static str,
        kind: &'static str,
        dimension: String,
    },
    #[error("interface dimension `{0}` needs both `dim1` and `dim2`")]
    IncompleteInterface(String),
    #[error("invalid cardinality `{0}`")]
    InvalidCardinality(String),
    #[error("grammar cache `{path}` has format `{found}`, expected version {expected}")]
    CacheFormat {
        path: PathBuf,
        found: String,
        expected: u32,
    },
}

impl GrammarError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> GrammarError {
        GrammarError::Io {
            path: path.into(),
            source,
        }
    }
}
