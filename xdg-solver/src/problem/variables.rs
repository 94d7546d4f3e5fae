use xdg_core::containers::HashMap;
use xdg_core::variables::IntVar;
use xdg_core::variables::SetVar;
use xdg_grammar::FeatureId;

use super::sentence::DimId;

/// The graph variables of one arc dimension, indexed by node and, for `outs` and `ins`, by label.
#[derive(Clone, Debug)]
pub(crate) struct ArcVariables {
    /// `outs[v][l]` are the daughters of `v` on label `l`.
    pub(crate) outs: Vec<Vec<SetVar>>,
    /// `ins[v][l]` are the mothers of `v` on label `l`.
    pub(crate) ins: Vec<Vec<SetVar>>,
    pub(crate) daughters: Vec<SetVar>,
    pub(crate) mothers: Vec<SetVar>,
    pub(crate) down: Vec<SetVar>,
    pub(crate) eqdown: Vec<SetVar>,
    pub(crate) up: Vec<SetVar>,
    pub(crate) equp: Vec<SetVar>,
}

impl ArcVariables {
    /// The out-variables of all nodes on label `label`.
    pub(crate) fn outs_on(&self, label: usize) -> Vec<SetVar> {
        self.outs.iter().map(|outs| outs[label]).collect()
    }

    pub(crate) fn ins_on(&self, label: usize) -> Vec<SetVar> {
        self.ins.iter().map(|ins| ins[label]).collect()
    }
}

/// Every variable of a problem that is shared between principles.
#[derive(Debug, Default)]
pub(crate) struct Variables {
    /// `lexvars[language][node]` is the entry node `node` selects in `language`.
    pub(crate) lexvars: Vec<Vec<IntVar>>,
    pub(crate) arcs: HashMap<DimId, ArcVariables>,
    /// The position of every node in the surface order of a generated dimension; each position is
    /// a singleton set.
    pub(crate) positions: HashMap<DimId, Vec<SetVar>>,
    pub(crate) agreement: HashMap<(DimId, usize, FeatureId), Agreement>,
}

/// The agreement value of a node for one feature, as an integer and as a singleton set.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Agreement {
    pub(crate) value: IntVar,
    pub(crate) set: SetVar,
}
