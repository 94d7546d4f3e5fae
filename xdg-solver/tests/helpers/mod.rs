//! Shared setup for the integration tests of the solver.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;
use xdg_core::search::SearchOptions;
use xdg_core::termination::Indefinite;
use xdg_core::SpaceOptions;
use xdg_grammar::format::LanguageSource;
use xdg_grammar::Grammar;
use xdg_solver::Multigraph;
use xdg_solver::Problem;
use xdg_solver::ProblemOptions;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The grammar made of the fixture languages `abbrevs`, in that order.
pub(crate) fn grammar(abbrevs: &[&str]) -> Grammar {
    let sources = abbrevs
        .iter()
        .map(|abbrev| {
            LanguageSource::read(&fixture(&format!("{abbrev}.json")), &[])
                .expect("fixture language is readable")
        })
        .collect();
    Grammar::new(sources).expect("fixture grammar is valid")
}

/// The grammar made of `languages`, each written as the JSON of a language file.
pub(crate) fn grammar_of(languages: Vec<serde_json::Value>) -> Grammar {
    let sources = languages
        .into_iter()
        .map(|language| {
            serde_json::from_value::<LanguageSource>(language).expect("language source is valid")
        })
        .collect();
    Grammar::new(sources).expect("grammar is valid")
}

pub(crate) fn tokens(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_owned).collect()
}

/// All solutions of `sentence`, parsed in `source` and generated in `targets`.
pub(crate) fn solve(
    grammar: &Grammar,
    source: &str,
    targets: &[&str],
    sentence: &str,
    search_options: SearchOptions,
) -> Vec<Multigraph> {
    let problem = Problem::new(
        grammar,
        source,
        targets,
        &tokens(sentence),
        &ProblemOptions::default(),
    )
    .expect("sentence compiles");
    problem
        .solutions(SpaceOptions::default(), search_options, Indefinite)
        .collect()
}

/// Run the solver binary with `args` and wait for it to finish.
pub(crate) fn run_solver(args: &[&str]) -> Output {
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_xdg-solver"));
    let mut child = Command::new(solver)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run solver.");

    match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => {
            let _ = child.kill();
            panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Ok(Some(_)) => child.wait_with_output().expect("output of the solver"),
        Err(e) => panic!("error starting solver: {e}"),
    }
}
