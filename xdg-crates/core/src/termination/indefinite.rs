use super::TerminationCondition;

/// No limit: the search ends only when the frontier runs empty or the solution limit is reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
