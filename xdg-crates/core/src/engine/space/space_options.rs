use enumset::EnumSet;

use crate::engine::propagation::ConstraintKind;

/// Options shared by a root space and all of its descendants.
#[derive(Clone, Copy, Debug)]
pub struct SpaceOptions {
    /// A space fails once the summed weight of its failed propagators exceeds this value.
    pub max_penalty: f64,
    /// The propagator kinds whose variable mutations are logged at trace level.
    pub trace: EnumSet<ConstraintKind>,
}

impl Default for SpaceOptions {
    fn default() -> Self {
        SpaceOptions {
            max_penalty: 0.9,
            trace: EnumSet::empty(),
        }
    }
}

impl SpaceOptions {
    /// Trace the mutations of every propagator kind.
    pub fn trace_all(mut self) -> Self {
        self.trace = EnumSet::all();
        self
    }
}
