use super::Choice;
use super::Distributor;
use crate::engine::Space;

/// Distributes on the first undetermined core variable, in the order the variables were made core.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputOrder;

impl Distributor for InputOrder {
    fn choose(&mut self, space: &Space) -> Option<Choice> {
        let variable = space.undetermined_core().next()?;
        Choice::on_smallest_value(space, variable)
    }
}
