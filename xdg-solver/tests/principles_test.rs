#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::collections::BTreeSet;

use helpers::grammar;
use helpers::grammar_of;
use helpers::solve;
use helpers::tokens;
use serde_json::json;
use serde_json::Value;
use xdg_core::branching::InputOrder;
use xdg_core::search::SearchOptions;
use xdg_core::termination::Indefinite;
use xdg_core::SpaceOptions;
use xdg_grammar::format::Cardinality;
use xdg_grammar::Grammar;
use xdg_grammar::Lexicon;
use xdg_solver::Graph;
use xdg_solver::Multigraph;
use xdg_solver::Problem;
use xdg_solver::ProblemOptions;

mod helpers;

fn parse(grammar: &Grammar, language: &str, sentence: &str) -> Vec<Multigraph> {
    solve(grammar, language, &[], sentence, SearchOptions::default())
}

fn mothers(graph: &Graph, node: usize) -> Vec<usize> {
    graph
        .arcs()
        .filter(|&(_, _, daughter)| daughter == node)
        .map(|(mother, _, _)| mother)
        .collect()
}

fn case_language() -> Value {
    json!({
        "abbrev": "cas",
        "name": "Case",
        "features": { "cas": [[0], [1]], "trans": [[0], [1]] },
        "dimensions": [
            { "abbrev": "id", "labels": ["root", "sb", "ob"],
              "principles": ["tree", "valency", "agr", "government", "arc_agreement"] }
        ],
        "lexicon": {
            "EOS": [
                { "name": "EOS", "pos": "eos",
                  "dims": { "id": { "outs": { "root": "!" } } } }
            ],
            "sees": [
                { "name": "see", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "sb": "!", "ob": "!" },
                                    "govern": { "sb": [["cas", [0]]], "ob": [["cas", [1]]] } } } }
            ],
            "eats": [
                { "name": "eat", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "sb": "!", "ob": "?" },
                                    "arcagr": { "ob": ["trans", [0], [1]] } } } }
            ],
            "sleeps": [
                { "name": "sleep", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "sb": "!", "ob": "?" },
                                    "agrs": { "trans": [[0]] },
                                    "arcagr": { "ob": ["trans", [0], [1]] } } } }
            ],
            "he": [
                { "name": "he", "pos": "pron",
                  "dims": { "id": { "ins": { "sb": "?", "ob": "?" }, "agrs": { "cas": [[0]] } } } }
            ],
            "him": [
                { "name": "him", "pos": "pron",
                  "dims": { "id": { "ins": { "sb": "?", "ob": "?" }, "agrs": { "cas": [[1]] } } } }
            ]
        }
    })
}

#[test]
fn governed_daughters_carry_the_required_case() {
    let grammar = grammar_of(vec![case_language()]);

    let solutions = parse(&grammar, "cas", "him sees he");
    assert_eq!(solutions.len(), 1);
    let arcs = solutions[0].graphs["cas:id"].arcs().collect::<Vec<_>>();
    assert!(arcs.contains(&(1, "sb", 2)));
    assert!(arcs.contains(&(1, "ob", 0)));

    assert!(parse(&grammar, "cas", "him sees him").is_empty());
}

#[test]
fn an_arc_sets_the_agreement_value_of_its_mother() {
    let grammar = grammar_of(vec![case_language()]);

    let intransitive = parse(&grammar, "cas", "he eats");
    assert_eq!(intransitive.len(), 1);
    assert_eq!(intransitive[0].graphs["cas:id"].agrs[1]["trans"], vec![0]);

    let transitive = parse(&grammar, "cas", "he eats him");
    assert_eq!(transitive.len(), 2);
    for solution in &transitive {
        assert_eq!(solution.graphs["cas:id"].agrs[1]["trans"], vec![1]);
    }
}

#[test]
fn an_arc_contradicting_a_fixed_agreement_value_is_rejected() {
    let grammar = grammar_of(vec![case_language()]);

    assert_eq!(parse(&grammar, "cas", "he sleeps").len(), 1);
    assert!(parse(&grammar, "cas", "he sleeps him").is_empty());
}

fn idiom_language() -> Value {
    json!({
        "abbrev": "idm",
        "name": "Idioms",
        "dimensions": [
            { "abbrev": "id", "labels": ["root", "ob"], "principles": ["tree", "valency", "group"] }
        ],
        "lexicon": {
            "EOS": [
                { "name": "EOS", "pos": "eos",
                  "dims": { "id": { "outs": { "root": "!" } } } }
            ],
            "kick": [
                { "name": "kick_idiom", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "ob": "!" },
                                    "gid": 1, "groupouts": ["ob"] } } },
                { "name": "kick", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "ob": "!" } } } }
            ],
            "bucket": [
                { "name": "bucket_idiom", "pos": "n",
                  "dims": { "id": { "ins": { "ob": "!" }, "gid": 1, "gheads": ["ob"] } } },
                { "name": "bucket", "pos": "n",
                  "dims": { "id": { "ins": { "ob": "!" } } } }
            ]
        }
    })
}

#[test]
fn idiom_parts_only_combine_with_each_other() {
    let grammar = grammar_of(vec![idiom_language()]);
    let solutions = parse(&grammar, "idm", "kick bucket");

    let readings = solutions
        .iter()
        .map(|solution| {
            let id = &solution.graphs["idm:id"];
            (id.entries[0].as_str(), id.entries[1].as_str())
        })
        .collect::<BTreeSet<_>>();
    assert_eq!(solutions.len(), 2);
    assert_eq!(
        readings,
        BTreeSet::from([("kick", "bucket"), ("kick_idiom", "bucket_idiom")])
    );
}

/// A language where `sees` may introduce a dropped subject.
fn pro_drop_language(abbrev: &str, principle: &str) -> Value {
    json!({
        "abbrev": abbrev,
        "name": "Pro-drop",
        "dimensions": [
            { "abbrev": "id", "labels": ["root", "del", "sb", "ob"],
              "principles": ["tree", "valency", principle] }
        ],
        "lexicon": {
            "EOS": [
                { "name": "EOS", "pos": "eos",
                  "dims": { "id": { "outs": { "root": "!", "del": "*" } } } }
            ],
            "sees": [
                { "name": "see_pro", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "sb": "!", "ob": "!" } } },
                  "empty_nodes": [{ "entry": "pro", "dim": "id", "label": "sb" }] },
                { "name": "see", "pos": "v",
                  "dims": { "id": { "ins": { "root": "!" }, "outs": { "sb": "!", "ob": "!" } } } }
            ],
            "him": [
                { "name": "him", "pos": "pron",
                  "dims": { "id": { "ins": { "sb": "?", "ob": "?" } } } }
            ],
            "mary": [
                { "name": "mary", "pos": "n",
                  "dims": { "id": { "ins": { "sb": "?", "ob": "?" } } } }
            ],
            "_pro": [
                { "name": "pro", "pos": "pron",
                  "dims": { "id": { "ins": { "sb": "?", "ob": "?", "del": "?" } } } }
            ]
        }
    })
}

#[test]
fn an_empty_node_exists_only_with_the_entry_introducing_it() {
    let grammar = grammar_of(vec![pro_drop_language("pro", "empty_node")]);

    // sees him <pro> EOS
    let dropped = parse(&grammar, "pro", "sees him");
    assert_eq!(dropped.len(), 2);
    let subjects = dropped
        .iter()
        .map(|solution| {
            let id = &solution.graphs["pro:id"];
            assert_eq!(id.entries[0], "see_pro");
            assert!(id.del_nodes.is_empty());
            id.arcs[0]["sb"][0]
        })
        .collect::<BTreeSet<_>>();
    assert_eq!(subjects, BTreeSet::from([1, 2]));

    // mary sees him <pro> EOS
    let overt = parse(&grammar, "pro", "mary sees him");
    assert_eq!(overt.len(), 2);
    for solution in &overt {
        let id = &solution.graphs["pro:id"];
        assert_eq!(id.entries[1], "see");
        assert_eq!(id.del_nodes, vec![3]);
    }

    assert!(parse(&grammar, "pro", "sees").is_empty());
}

#[test]
fn an_existing_empty_node_hangs_off_its_trigger() {
    let grammar = grammar_of(vec![pro_drop_language("cpro", "complex_empty_node")]);

    let dropped = parse(&grammar, "cpro", "sees him");
    assert_eq!(dropped.len(), 1);
    let arcs = dropped[0].graphs["cpro:id"].arcs().collect::<Vec<_>>();
    assert!(arcs.contains(&(0, "sb", 2)));
    assert!(arcs.contains(&(0, "ob", 1)));

    let overt = parse(&grammar, "cpro", "mary sees him");
    assert_eq!(overt.len(), 2);
    assert!(overt
        .iter()
        .all(|solution| solution.graphs["cpro:id"].is_deleted(3)));
}

/// Two words that may be linked on labels `a` and `b`, under graph principle `shape`.
fn shape_language(shape: &str) -> Value {
    let word = json!({
        "id": { "ins": { "root": "?", "a": "?", "b": "?" }, "outs": { "a": "?", "b": "?" } }
    });
    json!({
        "abbrev": shape,
        "name": "Shapes",
        "dimensions": [
            { "abbrev": "id", "labels": ["root", "a", "b"], "principles": [shape, "valency"] }
        ],
        "lexicon": {
            "EOS": [
                { "name": "EOS", "pos": "eos",
                  "dims": { "id": { "outs": { "root": "!" } } } }
            ],
            "x": [{ "name": "x", "pos": "w", "dims": word.clone() }],
            "y": [{ "name": "y", "pos": "w", "dims": word }]
        }
    })
}

fn shape_solutions(shape: &str) -> Vec<Graph> {
    let grammar = grammar_of(vec![shape_language(shape)]);
    parse(&grammar, shape, "x y")
        .into_iter()
        .map(|solution| solution.graphs[&format!("{shape}:id")].clone())
        .collect()
}

/// Whether some pair of nodes is linked by more than one arc.
fn has_parallel_arcs(graph: &Graph) -> bool {
    let pairs = graph
        .arcs()
        .map(|(mother, _, daughter)| (mother, daughter))
        .collect::<Vec<_>>();
    pairs.iter().collect::<BTreeSet<_>>().len() < pairs.len()
}

#[test]
fn graph_shapes_bound_the_mothers_of_a_node() {
    let tree = shape_solutions("tree");
    assert_eq!(tree.len(), 4);
    assert!(tree
        .iter()
        .all(|graph| (0..2).all(|node| mothers(graph, node).len() == 1)));

    let forest = shape_solutions("forest");
    assert_eq!(forest.len(), 6);
    assert!(forest
        .iter()
        .any(|graph| (0..2).any(|node| mothers(graph, node).is_empty())));
    assert!(forest.iter().all(|graph| !has_parallel_arcs(graph)));

    let dag = shape_solutions("dag");
    assert_eq!(dag.len(), 6);
    assert!(dag
        .iter()
        .all(|graph| (0..2).all(|node| !mothers(graph, node).is_empty())));
    assert!(dag.iter().any(has_parallel_arcs));

    let disjoint = shape_solutions("dag_disj_daugh");
    assert_eq!(disjoint.len(), 4);
    assert!(disjoint.iter().all(|graph| !has_parallel_arcs(graph)));

    let graph = shape_solutions("graph");
    assert_eq!(graph.len(), 14);
    assert!(graph
        .iter()
        .any(|graph| mothers(graph, 0).len() + mothers(graph, 1).len() == 3));
}

/// Every node but the end of the sentence has exactly one mother, and the number of arcs on
/// every label lies within the valency of the selected entry.
fn assert_well_formed_tree(grammar: &Grammar, language: &str, dim: &str, graph: &Graph) {
    let language = grammar.language(language).expect("language of the graph");
    let labels = language.labels(dim).expect("labels of the dimension");
    let eos = graph.entries.len() - 1;
    let cap = graph.entries.len() as u32;

    assert!(mothers(graph, eos).is_empty());
    for node in 0..eos {
        assert_eq!(mothers(graph, node).len(), 1, "mothers of node {node}");
    }
    let daughters = graph
        .arcs()
        .map(|(_, _, daughter)| daughter)
        .collect::<BTreeSet<_>>();
    assert_eq!(daughters, (0..eos).collect::<BTreeSet<_>>());

    for (node, name) in graph.entries.iter().enumerate() {
        let attributes = language
            .lexicon()
            .entry(name)
            .expect("entry of the node")
            .attributes(dim);
        for label in labels.iter() {
            let name = labels.name(label);
            let outs = graph.arcs[node].get(name).map_or(0, Vec::len);
            let ins = graph
                .arcs()
                .filter(|&(_, arc_label, daughter)| daughter == node && arc_label == name)
                .count();
            assert!(within(attributes.outs.get(&label), cap, outs), "outs {name} of {node}");
            assert!(within(attributes.ins.get(&label), cap, ins), "ins {name} of {node}");
        }
    }
}

/// Whether `count` arcs are admitted by `cardinality`; a label without one admits none.
fn within(cardinality: Option<&Cardinality>, cap: u32, count: usize) -> bool {
    let (lo, hi) = cardinality.map_or((0, 0), |cardinality| cardinality.capped(cap));
    (lo as usize..=hi as usize).contains(&count)
}

#[test]
fn solved_trees_satisfy_the_tree_and_valency_conditions() {
    let english = grammar(&["eng"]);
    for sentence in ["the dog barks", "the woman cleaned the house", "did you see the dog"] {
        let solutions = parse(&english, "eng", sentence);
        assert!(!solutions.is_empty(), "no parse of `{sentence}`");
        for solution in &solutions {
            assert_well_formed_tree(&english, "eng", "id", &solution.graphs["eng:id"]);
        }
    }

    let case = grammar_of(vec![case_language()]);
    for solution in parse(&case, "cas", "he eats him") {
        assert_well_formed_tree(&case, "cas", "id", &solution.graphs["cas:id"]);
    }

    let pro_drop = grammar_of(vec![pro_drop_language("pro", "empty_node")]);
    for solution in parse(&pro_drop, "pro", "mary sees him") {
        assert_well_formed_tree(&pro_drop, "pro", "id", &solution.graphs["pro:id"]);
    }
}

#[test]
fn the_distributor_does_not_change_the_solutions() {
    let grammar = grammar_of(vec![case_language()]);
    let problem = Problem::new(
        &grammar,
        "cas",
        &[],
        &tokens("he eats him"),
        &ProblemOptions::default(),
    )
    .expect("sentence compiles");

    let by_upper = problem
        .solutions(SpaceOptions::default(), SearchOptions::default(), Indefinite)
        .map(|solution| solution.to_string())
        .collect::<BTreeSet<_>>();
    let by_input = problem
        .solutions_with(
            SpaceOptions::default(),
            SearchOptions::default(),
            InputOrder,
            Indefinite,
        )
        .map(|solution| solution.to_string())
        .collect::<BTreeSet<_>>();

    assert_eq!(by_upper.len(), 2);
    assert_eq!(by_upper, by_input);
}
