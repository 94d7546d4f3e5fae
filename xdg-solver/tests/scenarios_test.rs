#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::collections::BTreeSet;

use helpers::grammar;
use helpers::solve;
use xdg_core::search::SearchOptions;

mod helpers;

#[test]
fn subject_agrees_with_the_verb() {
    let grammar = grammar(&["eng"]);
    let solutions = solve(&grammar, "eng", &[], "the dog barks", SearchOptions::default());

    assert_eq!(solutions.len(), 1);
    let id = &solutions[0].graphs["eng:id"];
    let arcs = id.arcs().collect::<Vec<_>>();
    assert!(arcs.contains(&(2, "sb", 1)));
    assert!(arcs.contains(&(1, "det", 0)));
    assert!(arcs.contains(&(3, "root", 2)));
    assert_eq!(id.agrs[1]["sbj"], vec![0, 0, 0]);
    assert_eq!(id.root_nodes, vec![2]);
}

#[test]
fn a_lone_token_hangs_off_the_end_of_the_sentence() {
    let grammar = grammar(&["eng"]);
    let solutions = solve(&grammar, "eng", &[], ".", SearchOptions::default());

    assert_eq!(solutions.len(), 1);
    let arcs = solutions[0].graphs["eng:id"].arcs().collect::<Vec<_>>();
    assert_eq!(arcs, vec![(1, "root", 0)]);
}

#[test]
fn crossing_dependencies_are_rejected() {
    let grammar = grammar(&["eng"]);
    let solutions = solve(
        &grammar,
        "eng",
        &[],
        "who did you see",
        SearchOptions {
            cutoff: 200,
            ..Default::default()
        },
    );

    assert!(solutions.is_empty());
}

#[test]
fn translation_keeps_arcs_and_assigns_distinct_positions() {
    let grammar = grammar(&["eng", "amh"]);
    let solutions = solve(
        &grammar,
        "eng",
        &["amh"],
        "the woman cleaned the house",
        SearchOptions::default(),
    );
    assert!(!solutions.is_empty());

    for solution in &solutions {
        let english = &solution.graphs["eng:id"];
        let amharic = &solution.graphs["amh:id"];
        let eos = amharic.positions.len() - 1;

        let positions = amharic.positions[..eos].iter().collect::<BTreeSet<_>>();
        assert_eq!(positions.len(), eos);
        assert!(positions.iter().all(|&&position| position < eos));

        let amharic_arcs = amharic.arcs().collect::<Vec<_>>();
        for (mother, label, daughter) in english.arcs() {
            if !amharic.is_deleted(daughter) {
                assert!(amharic_arcs.contains(&(mother, label, daughter)));
            }
        }
        assert_eq!(amharic.del_nodes, vec![0, 3]);
        assert_eq!(solution.outputs["amh"], "setwa betun atsedachi");
    }
}

#[test]
fn a_word_outside_the_lexicon_is_reported() {
    let grammar = grammar(&["eng"]);
    let result = xdg_solver::Problem::new(
        &grammar,
        "eng",
        &[],
        &helpers::tokens("the cat barks"),
        &xdg_solver::ProblemOptions::default(),
    );

    assert!(matches!(
        result,
        Err(xdg_solver::ProblemError::UnknownWord { word, .. }) if word == "cat"
    ));
}
