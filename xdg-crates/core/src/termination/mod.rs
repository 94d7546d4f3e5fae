//! A [`TerminationCondition`] is polled by the search before every expansion. It tells the search
//! to give up even though the frontier is not exhausted. The most common examples are
//! [`ExpansionBudget`], the cutoff on the number of expanded spaces, and [`TimeBudget`].
mod combinator;
mod expansion_budget;
mod indefinite;
mod time_budget;

pub use combinator::Combinator;
pub use expansion_budget::ExpansionBudget;
pub use indefinite::Indefinite;
pub use time_budget::TimeBudget;

/// Determines when the search should give up looking for further solutions.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called after the search has propagated a space taken from the frontier.
    fn space_expanded(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn space_expanded(&mut self) {
        if let Some(t) = self {
            t.space_expanded()
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for Box<T> {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn space_expanded(&mut self) {
        (**self).space_expanded()
    }
}
