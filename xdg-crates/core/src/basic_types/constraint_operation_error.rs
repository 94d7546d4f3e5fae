use thiserror::Error;

/// Errors raised while posting constraints, before any search takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintOperationError {
    #[error("selection variable `{selector}` can take {index}, but only values below {bound} select anything")]
    SelectionOutOfBounds {
        selector: String,
        index: u32,
        bound: u32,
    },
    #[error("intersection selection over `{0}` needs a selector that can be non-empty")]
    EmptyIntersectionSelector(String),
    #[error("propagator weight {0} is not within [0, 1]")]
    InvalidWeight(f64),
}
