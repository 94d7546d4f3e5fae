use crate::engine::variables::IntVar;
use crate::engine::variables::SetVar;
use crate::engine::variables::VarRef;

/// The variables a propagator reads or writes. A propagator is woken when any of them changes.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    variables: Vec<VarRef>,
}

impl Scope {
    pub fn new() -> Scope {
        Scope::default()
    }

    pub fn int(mut self, var: IntVar) -> Scope {
        self.variables.push(VarRef::Int(var));
        self
    }

    pub fn set(mut self, var: SetVar) -> Scope {
        self.variables.push(VarRef::Set(var));
        self
    }

    pub fn ints(mut self, vars: impl IntoIterator<Item = IntVar>) -> Scope {
        self.variables.extend(vars.into_iter().map(VarRef::Int));
        self
    }

    pub fn sets(mut self, vars: impl IntoIterator<Item = SetVar>) -> Scope {
        self.variables.extend(vars.into_iter().map(VarRef::Set));
        self
    }

    pub fn var(mut self, var: impl Into<VarRef>) -> Scope {
        self.variables.push(var.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.variables.iter().copied()
    }
}
