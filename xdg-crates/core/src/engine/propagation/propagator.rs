use std::fmt::Debug;
use std::fmt::Display;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSetType;

use super::PropagationContext;
use super::Scope;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::engine::Model;
use crate::engine::Space;

// Allows tests and callers to recover the concrete propagator behind a `Box<dyn Propagator>`.
impl_downcast!(Propagator);

/// A propagator enforces one relation over a fixed tuple of variables.
///
/// Propagators do not keep state between invocations: anything that has to survive a distribution
/// step lives in the [`Space`]. [`Propagator::infer`] is required to be monotone (it only ever
/// tightens bounds) but does not need to reach a fixed point on its own; the engine re-runs it as
/// long as one of its variables keeps changing.
pub trait Propagator: Downcast + Debug {
    /// The kind of relation, used for tracing and statistics.
    fn kind(&self) -> ConstraintKind;

    fn name(&self) -> &str {
        self.kind().name()
    }

    /// The variables this propagator depends on.
    fn scope(&self) -> Scope;

    /// Checked once when the propagator is added to `model`; rejects malformed propagators, such
    /// as a selection whose selector can point past its sequence.
    fn validate(&self, model: &Model) -> Result<(), ConstraintOperationError> {
        let _ = model;
        Ok(())
    }

    /// Whether the relation is certainly violated under the bounds of `space`.
    ///
    /// A cheap check; returning `false` does not promise that the relation is satisfiable.
    fn fails(&self, space: &Space) -> bool;

    /// Whether the relation holds for every assignment within the bounds of `space`. Once true in
    /// a space it stays true in every descendant.
    fn is_entailed(&self, space: &Space) -> bool;

    /// Narrow the bounds of the scope. Variable errors raised by the mutators propagate through
    /// `?` and make the propagator fail.
    fn infer(&self, context: &mut PropagationContext<'_>) -> PropagationStatus;
}

/// The closed set of propagator kinds.
#[derive(EnumSetType, Debug, Hash)]
pub enum ConstraintKind {
    Member,
    Subset,
    Superset,
    CardinalityGeq,
    CardinalityLeq,
    LessThan,
    CardinalityEq,
    SetConvexity,
    SupersetIntersection,
    SubsetUnion,
    CardinalitySubset,
    SetPrecedence,
    IvMemberSv,
    IntSelection,
    IntIntSelection,
    UnionSelection,
    IntersectionSelection,
    PrecedenceSelection,
    SimplePrecedenceSelection,
    EqualitySelection,
    SimpleEqualitySelection,
    ReifiedMembership,
    ReifiedInclusion,
    ReifiedEquality,
    LogEquivalence,
    LogImplication,
    SetInverse,
}

impl ConstraintKind {
    pub fn name(self) -> &'static str {
        match self {
            ConstraintKind::Member => "Member",
            ConstraintKind::Subset => "Subset",
            ConstraintKind::Superset => "Superset",
            ConstraintKind::CardinalityGeq => "CardinalityGEQ",
            ConstraintKind::CardinalityLeq => "CardinalityLEQ",
            ConstraintKind::LessThan => "LessThan",
            ConstraintKind::CardinalityEq => "CardinalityEq",
            ConstraintKind::SetConvexity => "SetConvexity",
            ConstraintKind::SupersetIntersection => "SupersetIntersection",
            ConstraintKind::SubsetUnion => "SubsetUnion",
            ConstraintKind::CardinalitySubset => "CardinalitySubset",
            ConstraintKind::SetPrecedence => "SetPrecedence",
            ConstraintKind::IvMemberSv => "IVMemberSV",
            ConstraintKind::IntSelection => "IntSelection",
            ConstraintKind::IntIntSelection => "IntIntSelection",
            ConstraintKind::UnionSelection => "UnionSelection",
            ConstraintKind::IntersectionSelection => "IntersectionSelection",
            ConstraintKind::PrecedenceSelection => "PrecedenceSelection",
            ConstraintKind::SimplePrecedenceSelection => "SimplePrecedenceSelection",
            ConstraintKind::EqualitySelection => "EqualitySelection",
            ConstraintKind::SimpleEqualitySelection => "SimpleEqualitySelection",
            ConstraintKind::ReifiedMembership => "ReifiedMembership",
            ConstraintKind::ReifiedInclusion => "ReifiedInclusion",
            ConstraintKind::ReifiedEquality => "ReifiedEquality",
            ConstraintKind::LogEquivalence => "LogEquivalence",
            ConstraintKind::LogImplication => "LogImplication",
            ConstraintKind::SetInverse => "SetInverse",
        }
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
