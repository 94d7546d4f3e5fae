use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use log::debug;
use xdg_grammar::FeatureValue;
use xdg_grammar::GenerationRequest;
use xdg_grammar::LexEntry;

use super::Graph;
use crate::problem::sentence::NodeKind;
use crate::problem::sentence::Sentence;
use crate::problem::sentence::EOS_FORM;

/// The surface form of every node in `language`, generated in the surface order of `order`.
///
/// Source words keep their form. Other nodes take the literal word of their entry, or the form
/// the morphology generates from the entry and the agreement values of the node, or else the root
/// of the entry.
pub(super) fn forms(
    sentence: &Sentence<'_>,
    language: usize,
    entries: &[&Arc<LexEntry>],
    order: &Graph,
    agrs: &[BTreeMap<String, FeatureValue>],
) -> Vec<String> {
    let morphology = sentence.languages[language].morphology();
    let mut forms = vec![String::new(); sentence.nodes.len()];

    for node in order.surface_order() {
        let entry = entries[node];
        let form = match sentence.nodes[node].kind {
            NodeKind::Eos => EOS_FORM.to_owned(),
            NodeKind::Word if language == 0 => sentence.nodes[node].form.clone(),
            _ => match &entry.word {
                Some(word) => word.clone(),
                None => {
                    let root = entry.root.as_deref().unwrap_or(&entry.name);
                    let daughters = order.arcs[node].values().flatten().copied().sorted().collect_vec();
                    let mothers = order
                        .arcs()
                        .filter(|&(_, _, daughter)| daughter == node)
                        .map(|(mother, _, _)| mother)
                        .sorted()
                        .dedup()
                        .collect_vec();
                    let request = GenerationRequest {
                        pos: &entry.pos,
                        root,
                        agrs: &agrs[node],
                        daughters: &daughters,
                        mothers: &mothers,
                        forms: &forms,
                        del_nodes: &order.del_nodes,
                    };
                    morphology
                        .and_then(|morphology| morphology.generate(&request))
                        .unwrap_or_else(|| {
                            debug!("no form generated for {} ({root})", entry.name);
                            root.to_owned()
                        })
                }
            },
        };
        forms[node] = if order.is_deleted(node) {
            format!("~{form}")
        } else {
            form
        };
    }
    forms
}

/// The sentence spelled out by `forms` in the surface order of `order`, without deleted nodes and
/// the end-of-sentence node.
pub(super) fn realize(order: &Graph, forms: &[String]) -> String {
    let eos = forms.len() - 1;
    order
        .surface_order()
        .into_iter()
        .filter(|&node| node != eos && !order.is_deleted(node))
        .map(|node| forms[node].as_str())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::realize;
    use crate::projection::Graph;

    #[test]
    fn deleted_nodes_are_left_out_of_the_sentence() {
        let graph = Graph {
            arcs: vec![BTreeMap::new(); 4],
            agrs: vec![BTreeMap::new(); 4],
            positions: vec![2, 0, 1, 3],
            del_nodes: vec![2],
            ..Graph::default()
        };
        let forms = ["dog", "the", "~a", "EOS"].map(str::to_owned);
        assert_eq!(realize(&graph, &forms), "the dog");
    }
}
