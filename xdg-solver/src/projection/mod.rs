//! Solutions read back as graphs: the arcs, agreement values and word order of every arc
//! dimension, and the sentences of the generated languages.
mod surface;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use itertools::Itertools;
use xdg_core::Space;
use xdg_grammar::DisplayValue;
use xdg_grammar::FeatureValue;
use xdg_grammar::LexEntry;

use crate::problem::sentence::DimId;
use crate::problem::sentence::Sentence;
use crate::problem::sentence::DELETION_LABEL;
use crate::problem::sentence::ROOT_LABEL;
use crate::problem::variables::Variables;

/// One solution: a graph for every arc dimension of the problem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Multigraph {
    /// The graphs by dimension, written `lang:dim`.
    pub graphs: BTreeMap<String, Graph>,
    /// The generated sentence of every target language.
    pub outputs: BTreeMap<String, String>,
    /// The summed weight of the constraints the solution violates.
    pub penalty: f64,
}

/// The graph of one arc dimension in a solution. Everything is indexed by node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// The daughters of every node, by label.
    pub arcs: Vec<BTreeMap<String, Vec<usize>>>,
    /// The agreement values of every node, by feature.
    pub agrs: Vec<BTreeMap<String, FeatureValue>>,
    pub positions: Vec<usize>,
    /// The names of the selected entries.
    pub entries: Vec<String>,
    /// The surface forms; deleted nodes are marked with a leading `~`.
    pub forms: Vec<String>,
    pub del_nodes: Vec<usize>,
    pub root_nodes: Vec<usize>,
    /// Whether the graph is the meaning of the sentence.
    pub semantic: bool,
}

impl Graph {
    /// All arcs as `(mother, label, daughter)`.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, &str, usize)> + '_ {
        self.arcs.iter().enumerate().flat_map(|(mother, labels)| {
            labels.iter().flat_map(move |(label, daughters)| {
                daughters
                    .iter()
                    .map(move |&daughter| (mother, label.as_str(), daughter))
            })
        })
    }

    pub fn is_deleted(&self, node: usize) -> bool {
        self.del_nodes.contains(&node)
    }

    /// The nodes in surface order.
    pub fn surface_order(&self) -> Vec<usize> {
        (0..self.positions.len())
            .sorted_by_key(|&node| self.positions[node])
            .collect()
    }

    fn node(&self, node: usize) -> String {
        format!("{}[{node}]", self.forms[node])
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (mother, label, daughter) in self.arcs() {
            writeln!(f, "  {} -{label}-> {}", self.node(mother), self.node(daughter))?;
        }
        for (node, agrs) in self.agrs.iter().enumerate() {
            if agrs.is_empty() {
                continue;
            }
            let values = agrs
                .iter()
                .map(|(feature, value)| format!("{feature}={}", DisplayValue(value)))
                .join(" ");
            writeln!(f, "  {}: {values}", self.node(node))?;
        }
        writeln!(
            f,
            "  order: {}",
            self.surface_order()
                .into_iter()
                .map(|node| self.node(node))
                .join(" ")
        )
    }
}

impl Multigraph {
    /// The generated sentences, one `lang: sentence` line each, followed by the arcs of the
    /// semantic dimensions.
    pub fn io(&self) -> String {
        let mut lines = self
            .outputs
            .iter()
            .map(|(language, sentence)| format!("{language}: {sentence}"))
            .collect::<Vec<_>>();
        for graph in self.graphs.values().filter(|graph| graph.semantic) {
            lines.extend(graph.arcs().map(|(mother, label, daughter)| {
                format!("{mother}: {} -{label}-> {daughter}", graph.entries[mother])
            }));
        }
        lines.join("\n")
    }
}

impl Display for Multigraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (dimension, graph) in &self.graphs {
            writeln!(f, "{dimension}")?;
            write!(f, "{graph}")?;
        }
        write!(f, "penalty: {:.2}", self.penalty)
    }
}

/// Read the solution `space` of the problem over `sentence`.
pub(crate) fn project(sentence: &Sentence<'_>, variables: &Variables, space: &Space) -> Multigraph {
    let num_nodes = sentence.nodes.len();
    let selected: Vec<Vec<&Arc<LexEntry>>> = (0..sentence.languages.len())
        .map(|language| {
            (0..num_nodes)
                .map(|node| {
                    let index = variables
                        .lexvars
                        .get(language)
                        .and_then(|lexvars| lexvars.get(node))
                        .and_then(|&lexvar| space.int_domain(lexvar).min())
                        .unwrap_or(0);
                    &sentence.entries(language, node)[index as usize]
                })
                .collect()
        })
        .collect();

    let mut graphs: BTreeMap<DimId, Graph> = BTreeMap::new();
    for (dim, dimension) in sentence.dimensions.iter().enumerate() {
        if dimension.labels().is_some() {
            let entries = &selected[dimension.language];
            let _ = graphs.insert(dim, read_graph(sentence, variables, space, dim, entries));
        }
    }

    let mut outputs = BTreeMap::new();
    for (language, abbrev) in sentence.languages.iter().map(|language| language.abbrev()).enumerate() {
        let dims = graphs
            .keys()
            .copied()
            .filter(|&dim| sentence.dimensions[dim].language == language)
            .collect::<Vec<_>>();
        let order_dim = sentence.languages[language]
            .order_dimension()
            .and_then(|order| {
                dims.iter()
                    .copied()
                    .find(|&dim| sentence.dimensions[dim].dimension.abbrev == order)
            })
            .or_else(|| dims.first().copied());
        let Some(order_dim) = order_dim else {
            continue;
        };

        let mut agrs = vec![BTreeMap::new(); num_nodes];
        for dim in &dims {
            for (node, values) in graphs[dim].agrs.iter().enumerate() {
                agrs[node].extend(values.clone());
            }
        }
        let forms = surface::forms(sentence, language, &selected[language], &graphs[&order_dim], &agrs);
        if language > 0 {
            let _ = outputs.insert(abbrev.to_owned(), surface::realize(&graphs[&order_dim], &forms));
        }
        for dim in &dims {
            if let Some(graph) = graphs.get_mut(dim) {
                graph.forms = forms.clone();
            }
        }
    }

    Multigraph {
        graphs: graphs
            .into_iter()
            .map(|(dim, graph)| (sentence.dimensions[dim].reference.to_string(), graph))
            .collect(),
        outputs,
        penalty: space.penalty(),
    }
}

fn read_graph(
    sentence: &Sentence<'_>,
    variables: &Variables,
    space: &Space,
    dim: DimId,
    entries: &[&Arc<LexEntry>],
) -> Graph {
    let dimension = &sentence.dimensions[dim];
    let language = sentence.languages[dimension.language];
    let num_nodes = sentence.nodes.len();
    let eos = sentence.eos();

    let mut arcs = vec![BTreeMap::new(); num_nodes];
    if let (Some(labels), Some(vars)) = (dimension.labels(), variables.arcs.get(&dim)) {
        for (node, outs) in vars.outs.iter().enumerate() {
            for label in labels.iter() {
                let daughters = space
                    .set_bounds(outs[label as usize])
                    .lower()
                    .iter()
                    .map(|daughter| daughter as usize)
                    .collect::<Vec<_>>();
                if !daughters.is_empty() {
                    let _ = arcs[node].insert(labels.name(label).to_owned(), daughters);
                }
            }
        }
    }

    let mut agrs = vec![BTreeMap::new(); num_nodes];
    for (&(agr_dim, node, feature), agreement) in &variables.agreement {
        if agr_dim != dim {
            continue;
        }
        let feature = language.feature(feature);
        let value = space
            .int_domain(agreement.value)
            .min()
            .and_then(|code| feature.value(code));
        if let Some(value) = value {
            let _ = agrs[node].insert(feature.name().to_owned(), value.clone());
        }
    }

    let positions = match variables.positions.get(&dim) {
        Some(positions) => positions
            .iter()
            .map(|&position| {
                let bounds = space.set_bounds(position);
                bounds
                    .lower()
                    .min()
                    .or_else(|| bounds.upper().min())
                    .unwrap_or_default() as usize
            })
            .collect(),
        None => (0..num_nodes).collect(),
    };

    let eos_daughters = |label: &str| arcs[eos].get(label).cloned().unwrap_or_default();
    let del_nodes = eos_daughters(DELETION_LABEL);
    let root_nodes = eos_daughters(ROOT_LABEL);

    Graph {
        positions,
        entries: entries.iter().map(|entry| entry.name.clone()).collect(),
        forms: sentence.nodes.iter().map(|node| node.form.clone()).collect(),
        del_nodes,
        root_nodes,
        semantic: dimension.dimension.semantic,
        agrs,
        arcs,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::Graph;
    use super::Multigraph;

    fn graph() -> Graph {
        Graph {
            arcs: vec![
                BTreeMap::new(),
                BTreeMap::from([("sb".to_owned(), vec![0])]),
                BTreeMap::from([("root".to_owned(), vec![1])]),
            ],
            agrs: vec![BTreeMap::new(); 3],
            positions: vec![0, 1, 2],
            entries: vec!["dog".to_owned(), "bark".to_owned(), "EOS".to_owned()],
            forms: vec!["dog".to_owned(), "barks".to_owned(), "EOS".to_owned()],
            del_nodes: vec![],
            root_nodes: vec![1],
            semantic: true,
        }
    }

    #[test]
    fn arcs_are_listed_by_mother() {
        let graph = graph();
        let arcs = graph.arcs().collect::<Vec<_>>();
        assert_eq!(arcs, vec![(1, "sb", 0), (2, "root", 1)]);
    }

    #[test]
    fn io_lists_outputs_then_semantic_arcs() {
        let multigraph = Multigraph {
            graphs: BTreeMap::from([("eng:sem".to_owned(), graph())]),
            outputs: BTreeMap::from([("amh".to_owned(), "wsha ybelal".to_owned())]),
            penalty: 0.0,
        };
        assert_eq!(
            multigraph.io(),
            "amh: wsha ybelal\n1: bark -sb-> 0\n2: EOS -root-> 1"
        );
    }

    #[test]
    fn display_names_nodes_by_form() {
        let rendered = graph().to_string();
        assert!(rendered.contains("barks[1] -sb-> dog[0]"));
        assert!(rendered.contains("order: dog[0] barks[1] EOS[2]"));
    }
}
