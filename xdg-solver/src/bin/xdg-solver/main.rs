mod os_signal_termination;
mod result;

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::XdgError;
use result::XdgResult;
use xdg_core::convert_case::Case;
use xdg_core::search::SearchOptions;
use xdg_core::search::SearchStrategy;
use xdg_core::statistics::configure_statistic_logging;
use xdg_core::statistics::log_statistic_postfix;
use xdg_core::statistics::Statistic;
use xdg_core::statistics::StatisticLogger;
use xdg_core::termination::Combinator;
use xdg_core::termination::TimeBudget;
use xdg_core::SpaceOptions;
use xdg_grammar::format::LanguageSource;
use xdg_grammar::Grammar;
use xdg_grammar::GrammarCache;
use xdg_grammar::Tokenizer;
use xdg_grammar::WhitespaceTokenizer;
use xdg_solver::Problem;
use xdg_solver::ProblemOptions;

/// The name under which grammars are stored in the cache directory.
const CACHE_GRAMMAR_NAME: &str = "xdg";

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The sentence to parse.
    sentence: String,

    /// The language file of the source language, in the JSON grammar format.
    #[arg(long)]
    grammar: PathBuf,

    /// The language file of a language to translate into. May be given several times.
    #[arg(long = "target")]
    targets: Vec<PathBuf>,

    /// A directory in which parsed language files are cached.
    ///
    /// A cached language is reparsed when its language file is newer than the cache.
    #[arg(long, verbatim_doc_comment)]
    cache_dir: Option<PathBuf>,

    /// Stop after this many solutions.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 'n', long = "max-solutions", verbatim_doc_comment)]
    max_solutions: Option<u64>,

    /// The maximum number of search tree nodes that are expanded.
    ///
    /// Possible values: u64
    #[arg(long, default_value_t = 1000, verbatim_doc_comment)]
    cutoff: u64,

    /// The time budget for the search, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The order in which the search tree is explored.
    #[arg(long, value_enum, default_value_t)]
    strategy: SearchStrategy,

    /// A space fails once the summed weight of its failed constraints exceeds this value.
    ///
    /// Possible values: f64
    #[arg(long, default_value_t = 0.9, verbatim_doc_comment)]
    max_penalty: f64,

    /// Logs every variable change made during propagation. Implies the most verbose logging.
    #[arg(long)]
    trace: bool,

    /// Enables log message output. Given once, debug messages are shown; given twice, trace
    /// messages as well.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enables logging of the search statistics.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "statistics", verbatim_doc_comment)]
    statistics: bool,

    /// Removes the timestamp information from the log messages.
    ///
    /// Possible values: bool
    #[arg(long = "omit-timestamp", verbatim_doc_comment)]
    omit_timestamp: bool,

    /// Removes the call site information from the log messages. The call site is the file and
    /// line from which the message originated.
    ///
    /// Possible values: bool
    #[arg(long = "omit-call-site", default_value_t = false, verbatim_doc_comment)]
    omit_call_site: bool,
}

fn configure_logging(
    level_filter: LevelFilter,
    statistics: bool,
    omit_timestamp: bool,
    omit_call_site: bool,
) {
    if statistics {
        configure_statistic_logging("%% xdg-stat:", None, Some(Case::Snake), None);
    }

    env_logger::Builder::new()
        .format(move |buf, record| {
            if !omit_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{} ", record.level())?;
            if !omit_call_site {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns whether any solution was found.
fn run() -> XdgResult<bool> {
    let args = Args::parse();

    let level_filter = match (args.trace, args.verbose) {
        (true, _) | (_, 2..) => LevelFilter::Trace,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Warn,
    };
    configure_logging(
        level_filter,
        args.statistics,
        args.omit_timestamp,
        args.omit_call_site,
    );

    if xdg_core::xdg_asserts::XDG_ASSERT_LEVEL_DEFINITION
        >= xdg_core::xdg_asserts::XDG_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the XDG assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            xdg_core::xdg_asserts::XDG_ASSERT_LEVEL_DEFINITION
        );
    }

    let cache = args.cache_dir.as_ref().map(GrammarCache::new);
    let sources = std::iter::once(&args.grammar)
        .chain(&args.targets)
        .map(|path| load_language(path, cache.as_ref()))
        .collect::<XdgResult<Vec<_>>>()?;
    let abbrevs = sources
        .iter()
        .map(|source| source.abbrev.clone())
        .collect::<Vec<_>>();
    let grammar = Grammar::new(sources)?;

    let tokens = WhitespaceTokenizer.tokenize(&args.sentence);
    if tokens.is_empty() {
        return Err(XdgError::EmptySentence);
    }
    let targets = abbrevs[1..].iter().map(String::as_str).collect::<Vec<_>>();
    let problem = Problem::new(
        &grammar,
        &abbrevs[0],
        &targets,
        &tokens,
        &ProblemOptions::default(),
    )?;

    let space_options = SpaceOptions {
        max_penalty: args.max_penalty,
        ..SpaceOptions::default()
    };
    let space_options = if args.trace {
        space_options.trace_all()
    } else {
        space_options
    };
    let search_options = SearchOptions {
        strategy: args.strategy,
        cutoff: args.cutoff,
        max_solutions: args.max_solutions,
    };
    let time_limit = args
        .time_limit
        .map(|ms| TimeBudget::starting_now(Duration::from_millis(ms)));
    let termination = Combinator::new(OsSignal::install()?, time_limit);

    let mut solutions = problem.solutions(space_options, search_options, termination);
    let mut num_solutions = 0;
    for solution in solutions.by_ref() {
        num_solutions += 1;
        println!("solution {num_solutions}:");
        println!("{solution}");
        let io = solution.io();
        if !io.is_empty() {
            println!("{io}");
        }
    }

    if args.statistics {
        solutions.statistics().log(StatisticLogger::new("search"));
        log_statistic_postfix();
    }

    if num_solutions == 0 {
        let reason = solutions
            .stop_reason()
            .map_or_else(|| "search space exhausted".to_owned(), |reason| reason.to_string());
        println!("no solutions ({reason})");
        return Ok(false);
    }
    Ok(true)
}

fn load_language(path: &Path, cache: Option<&GrammarCache>) -> XdgResult<LanguageSource> {
    let source = match cache {
        Some(cache) => {
            let key = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("language");
            cache.load_or_parse(key, CACHE_GRAMMAR_NAME, path, &[])?
        }
        None => LanguageSource::read(path, &[])?,
    };
    Ok(source)
}
