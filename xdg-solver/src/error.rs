use thiserror::Error;
use xdg_core::ConstraintOperationError;
use xdg_grammar::GrammarError;

/// Errors raised while turning a sentence into a constraint problem.
#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("`{word}` is not in the lexicon of `{language}`")]
    UnknownWord { language: String, word: String },
    #[error("no entry of `{word}` translates into `{language}`")]
    NoTranslation { language: String, word: String },
    #[error("node {node} does not exist; the problem has {num_nodes} nodes")]
    InvalidNode { node: usize, num_nodes: usize },
    #[error("{0}")]
    Grammar(#[from] GrammarError),
    #[error("failed to post the constraints of `{principle}`: {source}")]
    Constraint {
        principle: String,
        #[source]
        source: ConstraintOperationError,
    },
}
