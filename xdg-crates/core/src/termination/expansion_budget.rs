use super::TerminationCondition;

/// Stops the search after a fixed number of space expansions.
#[derive(Debug, Copy, Clone)]
pub struct ExpansionBudget {
    budget: u64,
    num_expansions: u64,
}

impl ExpansionBudget {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            num_expansions: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.num_expansions >= self.budget
    }
}

impl TerminationCondition for ExpansionBudget {
    fn should_stop(&mut self) -> bool {
        self.is_exhausted()
    }

    fn space_expanded(&mut self) {
        self.num_expansions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::ExpansionBudget;
    use crate::termination::TerminationCondition;

    #[test]
    fn zero_budget_stops_immediately() {
        assert!(ExpansionBudget::new(0).should_stop());
    }

    #[test]
    fn budget_counts_expansions() {
        let mut budget = ExpansionBudget::new(3);
        for _ in 0..2 {
            budget.space_expanded();
        }
        assert!(!budget.should_stop());
        budget.space_expanded();
        assert!(budget.should_stop());
    }
}
