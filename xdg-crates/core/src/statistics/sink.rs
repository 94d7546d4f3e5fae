//! The process-wide destination of statistic lines.

use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

struct StatisticSink {
    prefix: &'static str,
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    out: Box<dyn Write + Send>,
}

impl StatisticSink {
    fn emit(&mut self, name: &str, value: &str) {
        let name = match self.casing {
            Some(casing) => name.to_case(casing),
            None => name.to_owned(),
        };
        let _ = writeln!(self.out, "{} {name}={value}", self.prefix);
    }
}

static SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// Enables statistic output. Every statistic becomes a line `{prefix} {name}={value}`, where
/// `name` is converted to `casing` if given; `closing_line` is written by
/// [`log_statistic_postfix`]. Output goes to stdout unless `out` is given.
///
/// The first configuration wins; later calls are ignored.
pub fn configure_statistic_logging(
    prefix: &'static str,
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    out: Option<Box<dyn Write + Send>>,
) {
    let _ = SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            prefix,
            closing_line,
            casing,
            out: out.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
}

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Some(Ok(mut sink)) = SINK.get().map(Mutex::lock) {
        action(&mut sink);
    }
}

/// Writes one statistic line. Does nothing before statistic logging is configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| sink.emit(&name.to_string(), &value.to_string()));
}

/// Ends a block of statistics with the configured closing line.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(line) = sink.closing_line {
            let _ = writeln!(sink.out, "{line}");
        }
    });
}
