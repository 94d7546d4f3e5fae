use thiserror::Error;
use xdg_grammar::GrammarError;
use xdg_solver::ProblemError;

pub(crate) type XdgResult<T> = Result<T, XdgError>;

#[derive(Error, Debug)]
pub(crate) enum XdgError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to load the grammar, more details: {0}")]
    Grammar(#[from] GrammarError),
    #[error("Failed to set up the problem, more details: {0}")]
    Problem(#[from] ProblemError),
    #[error("The sentence is empty.")]
    EmptySentence,
}
