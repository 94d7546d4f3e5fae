use super::TerminationCondition;

/// Stops the search as soon as either of two conditions does, e.g. an OS signal or a time limit.
/// Both conditions see every expanded space.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Combinator<First, Second> {
    pub fn new(first: First, second: Second) -> Self {
        Self { first, second }
    }
}

impl<First, Second> TerminationCondition for Combinator<First, Second>
where
    First: TerminationCondition,
    Second: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn space_expanded(&mut self) {
        self.first.space_expanded();
        self.second.space_expanded();
    }
}

#[cfg(test)]
mod tests {
    use super::Combinator;
    use crate::termination::ExpansionBudget;
    use crate::termination::Indefinite;
    use crate::termination::TerminationCondition;

    #[test]
    fn an_exhausted_budget_stops_an_indefinite_search() {
        let mut condition = Combinator::new(Indefinite, ExpansionBudget::new(2));
        assert!(!condition.should_stop());
        condition.space_expanded();
        assert!(!condition.should_stop());
        condition.space_expanded();
        assert!(condition.should_stop());
    }

    #[test]
    fn expansions_reach_both_conditions() {
        let mut condition = Combinator::new(ExpansionBudget::new(1), ExpansionBudget::new(3));
        condition.space_expanded();
        assert!(condition.should_stop());
    }
}
