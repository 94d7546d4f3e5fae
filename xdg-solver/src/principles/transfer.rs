//! Lexical transfer: the entry a node selects in a target language must be a translation of the
//! entry it selects in the source language.
use xdg_core::propagators::IvMemberSv;

use super::CompilationContext;
use crate::ProblemError;

pub(crate) fn run(context: &mut CompilationContext<'_, '_>) -> Result<(), ProblemError> {
    let sentence = context.sentence;

    for v in 0..context.num_nodes() {
        let _ = context.lexvar(0, v);
    }

    for target in 1..sentence.languages.len() {
        let abbrev = sentence.languages[target].abbrev();
        for (v, node) in sentence.nodes.iter().enumerate() {
            let allowed = context.select_by_entry(
                0,
                v,
                format!("{abbrev}:translations[{v}]"),
                node.translations[target - 1].clone(),
            )?;
            let lexvar = context.lexvar(target, v);
            context.post(IvMemberSv::new(lexvar, allowed))?;
        }
    }
    Ok(())
}
