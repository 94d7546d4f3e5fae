use std::fmt::Display;
use std::fmt::Write;

use super::sink::log_statistic;

/// Names statistics by their path in a statistics struct, e.g. `search_num_expansions`.
#[derive(Debug, Default)]
pub struct StatisticLogger {
    path: String,
}

impl StatisticLogger {
    pub fn new(root: impl Display) -> Self {
        Self {
            path: root.to_string(),
        }
    }

    /// A logger for the field `name` below this one.
    pub fn attach_to_prefix(&self, name: impl Display) -> Self {
        let path = match self.path.as_str() {
            "" => name.to_string(),
            parent => format!("{parent}_{name}"),
        };
        Self { path }
    }
}

impl Write for StatisticLogger {
    fn write_str(&mut self, value: &str) -> std::fmt::Result {
        log_statistic(&self.path, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StatisticLogger;

    #[test]
    fn nested_names_are_joined_by_underscores() {
        let logger = StatisticLogger::new("search").attach_to_prefix("num_solutions");
        assert_eq!(logger.path, "search_num_solutions");
        assert_eq!(StatisticLogger::default().attach_to_prefix("x").path, "x");
    }
}
