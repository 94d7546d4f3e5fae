use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops the search once a wall-clock deadline has passed.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    /// A deadline `limit` from now.
    pub fn starting_now(limit: Duration) -> Self {
        Self {
            deadline: Instant::now() + limit,
        }
    }

    /// The time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TimeBudget;
    use crate::termination::TerminationCondition;

    #[test]
    fn an_empty_budget_stops_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);
        assert!(budget.should_stop());
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn a_long_budget_keeps_running() {
        let mut budget = TimeBudget::starting_now(Duration::from_secs(3600));
        assert!(!budget.should_stop());
        assert!(budget.remaining() > Duration::from_secs(3500));
    }
}
