use std::fmt::Display;

use crate::containers::StorageKey;

/// A finite-domain integer variable. The handle is only meaningful for the model that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar {
    id: u32,
}

/// A finite-domain set variable. The handle is only meaningful for the model that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetVar {
    id: u32,
}

impl StorageKey for IntVar {
    fn index(self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        IntVar { id: index as u32 }
    }
}

impl StorageKey for SetVar {
    fn index(self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        SetVar { id: index as u32 }
    }
}

impl Display for IntVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.id)
    }
}

impl Display for SetVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.id)
    }
}

/// Either kind of variable; used wherever integer and set variables are handled uniformly, such
/// as the changed-variable buffer and the distribution choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarRef {
    Int(IntVar),
    Set(SetVar),
}

impl From<IntVar> for VarRef {
    fn from(var: IntVar) -> Self {
        VarRef::Int(var)
    }
}

impl From<SetVar> for VarRef {
    fn from(var: SetVar) -> Self {
        VarRef::Set(var)
    }
}

/// A variable read as a truth value: an integer variable is true when it is non-zero, a set
/// variable when it is non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoolView {
    Int(IntVar),
    Set(SetVar),
}

impl From<IntVar> for BoolView {
    fn from(var: IntVar) -> Self {
        BoolView::Int(var)
    }
}

impl From<SetVar> for BoolView {
    fn from(var: SetVar) -> Self {
        BoolView::Set(var)
    }
}

impl From<BoolView> for VarRef {
    fn from(view: BoolView) -> Self {
        match view {
            BoolView::Int(var) => VarRef::Int(var),
            BoolView::Set(var) => VarRef::Set(var),
        }
    }
}
