//! Distribution: how an undetermined space is split into two children.
//!
//! A [`Distributor`] looks at a distributable [`Space`] and produces a [`Choice`]: an undetermined
//! core variable together with two basic constraints that partition its remaining values. The
//! positive constraint is added to the first child, the negative one to the second.
mod input_order;
mod smallest_upper;

pub use input_order::InputOrder;
pub use smallest_upper::SmallestUpper;

use crate::containers::IntSet;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::VarRef;
use crate::engine::Space;
use crate::propagators::BasicConstraint;

/// A binary split of the values of one variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub variable: VarRef,
    pub positive: BasicConstraint,
    pub negative: BasicConstraint,
}

impl Choice {
    /// Split `variable` on its smallest undecided value `v`: an integer variable is either `v` or
    /// not, a set variable either contains `v` or not.
    pub fn on_smallest_value(space: &Space, variable: VarRef) -> Option<Choice> {
        match variable {
            VarRef::Int(var) => {
                let domain = space.domain(var);
                if domain.len() < 2 {
                    return None;
                }
                let value = domain.min()?;
                let mut rest = domain.clone();
                let _ = rest.remove(value);
                Some(Choice {
                    variable,
                    positive: BasicConstraint::Member(var, IntSet::singleton(value)),
                    negative: BasicConstraint::Member(var, rest),
                })
            }
            VarRef::Set(var) => {
                let bounds = space.bounds(var);
                let value = bounds.undecided().min()?;
                let mut lower = bounds.lower().clone();
                let _ = lower.insert(value);
                let mut upper = bounds.upper().clone();
                let _ = upper.remove(value);
                Some(Choice {
                    variable,
                    positive: BasicConstraint::Superset(var, lower),
                    negative: BasicConstraint::Subset(var, upper),
                })
            }
        }
    }
}

/// Selects how a distributable space is split.
pub trait Distributor {
    /// The choice to split `space` on, or `None` when no core variable is undetermined.
    fn choose(&mut self, space: &Space) -> Option<Choice>;
}

impl<D: Distributor + ?Sized> Distributor for Box<D> {
    fn choose(&mut self, space: &Space) -> Option<Choice> {
        (**self).choose(space)
    }
}
