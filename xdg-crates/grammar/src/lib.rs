//! # XDG grammars
//! The languages an XDG problem is built from: their features, dimensions, lexicons and
//! morphology.
//!
//! Languages are read from JSON [`format::LanguageSource`] files and compiled together into a
//! [`Grammar`], which resolves every label, feature and entry name to the integers the constraint
//! model works with. Structural errors in a language are fatal, while malformed lexical entries
//! are dropped with a warning.
//!
//! # Example
//! ```
//! # use xdg_grammar::format::LanguageSource;
//! # use xdg_grammar::Grammar;
//! # use xdg_grammar::Lexicon;
//! let english: LanguageSource = serde_json::from_str(
//!     r#"{
//!         "abbrev": "eng", "name": "English",
//!         "dimensions": [ { "abbrev": "id", "labels": ["root", "del"], "principles": ["tree"] } ],
//!         "lexicon": { "EOS": [ { "name": "EOS", "pos": "eos",
//!                                 "dims": { "id": { "outs": { "root": "!", "del": "*" } } } } ] }
//!     }"#,
//! )
//! .unwrap();
//!
//! let grammar = Grammar::new(vec![english]).unwrap();
//! let eos = &grammar.language("eng").unwrap().lexicon().entries("EOS")[0];
//! assert_eq!(eos.attributes("id").outs.len(), 2);
//! ```
mod agreement;
mod cache;
mod dimension;
mod entry;
mod error;
mod feature;
pub mod format;
mod grammar;
mod language;
mod lexicon;
mod morphology;
mod tokenizer;

pub use agreement::AgreementMaps;
pub use agreement::QualifiedFeature;
pub use cache::GrammarCache;
pub use cache::FORMAT_VERSION;
pub use dimension::Dimension;
pub use dimension::DimensionKind;
pub use dimension::DimensionRef;
pub use dimension::Label;
pub use dimension::LabelSet;
pub use dimension::LinkKind;
pub use dimension::PrincipleKind;
pub use entry::Agree;
pub use entry::ArcAgreement;
pub use entry::Attributes;
pub use entry::CrossLex;
pub use entry::EmptyNodeSpec;
pub use entry::Govern;
pub use entry::LexEntry;
pub use error::GrammarError;
pub use feature::DisplayValue;
pub use feature::Feature;
pub use feature::FeatureId;
pub use feature::FeatureValue;
pub use grammar::Grammar;
pub use grammar::NODE_ORDER_ITEM;
pub use language::Language;
pub use lexicon::Lexicon;
pub use lexicon::MapLexicon;
pub use morphology::Analysis;
pub use morphology::CachedMorphology;
pub use morphology::GenerationRequest;
pub use morphology::Morphology;
pub use morphology::TableMorphology;
pub use tokenizer::Tokenizer;
pub use tokenizer::WhitespaceTokenizer;
