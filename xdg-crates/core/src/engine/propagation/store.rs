use std::ops::Index;
use std::rc::Rc;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;

/// What the engine knows about a propagator besides its relation: how much its failure costs and
/// which principle introduced it.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagatorTag {
    /// The penalty a space accumulates when this propagator fails.
    pub weight: f64,
    /// The principle (or other origin) that posted the propagator, for logging.
    pub principle: Option<Rc<str>>,
}

impl Default for PropagatorTag {
    fn default() -> Self {
        PropagatorTag {
            weight: 1.0,
            principle: None,
        }
    }
}

impl PropagatorTag {
    pub fn origin(&self) -> &str {
        self.principle.as_deref().unwrap_or("model")
    }
}

#[derive(Debug)]
struct StoredPropagator {
    propagator: Box<dyn Propagator>,
    tag: PropagatorTag,
}

/// All propagators of a model, indexed by [`PropagatorId`].
#[derive(Debug, Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, StoredPropagator>,
}

impl PropagatorStore {
    pub(crate) fn add(&mut self, propagator: Box<dyn Propagator>, tag: PropagatorTag) -> PropagatorId {
        self.propagators.push(StoredPropagator { propagator, tag })
    }

    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PropagatorId> + '_ {
        self.propagators.keys()
    }

    pub(crate) fn tag(&self, id: PropagatorId) -> &PropagatorTag {
        &self.propagators[id].tag
    }

    /// Recover the concrete propagator behind `id`, if it is a `P`.
    pub(crate) fn get_propagator<P: Propagator>(&self, id: PropagatorId) -> Option<&P> {
        self.propagators.get(id)?.propagator.downcast_ref()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].propagator.as_ref()
    }
}
