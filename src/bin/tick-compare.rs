//! CLI tool to compare two harness tick logs.
//!
//! Usage:
//!   tick-compare <source.log> <target.log>
//!   tick-compare <source.log> <target.log> --mode cached --cache-size 20 -i time,seq
//!
//! Exits 0 when every compared tick passes, 1 otherwise.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tick_compare::{
    Aggregate, CompareConfig, DEFAULT_CACHE_SIZE, DEFAULT_MARKER, IgnoreSet, Mode, Reporter,
    Verbosity, compare_files,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Compare a source tick log against a target tick log.
///
/// Each log is split into ticks at marker lines; every other line is a
/// `key value...` field. Ticks are compared field by field.
#[derive(Parser)]
#[command(name = "tick-compare", version)]
struct Cli {
    /// Source log (reference stream)
    source: PathBuf,

    /// Target log (stream under test)
    target: PathBuf,

    /// Matching algorithm
    #[arg(short, long, value_enum, default_value_t = Mode::Exact)]
    mode: Mode,

    /// Sliding window size for cached mode
    #[arg(short, long, default_value_t = DEFAULT_CACHE_SIZE)]
    cache_size: usize,

    /// Field to leave out of the comparison (repeatable, or comma separated)
    #[arg(short, long = "ignore", value_name = "FIELD", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Line that starts a tick (repeatable) [default: MESSAGE]
    #[arg(long = "marker", value_name = "LINE")]
    markers: Vec<String>,

    /// Print a line for every compared tick, not just failures
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print nothing; report through the exit code only
    #[arg(short, long)]
    quiet: bool,

    /// Succeed when the source holds no ticks at all
    #[arg(long)]
    allow_empty: bool,
}

impl Cli {
    fn config(&self) -> CompareConfig {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::All
        } else {
            Verbosity::Failures
        };
        let markers = if self.markers.is_empty() {
            vec![DEFAULT_MARKER.to_string()]
        } else {
            self.markers.clone()
        };
        let ignore: IgnoreSet = self
            .ignore
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();

        CompareConfig::new(self.mode)
            .with_cache_size(self.cache_size)
            .with_ignore(ignore)
            .with_markers(markers)
            .with_verbosity(verbosity)
            .with_allow_empty(self.allow_empty)
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tick_compare=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print and exit 0
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{e}");
            process::exit(1);
        }
    };
    init_logging();

    let config = cli.config();
    let mut reporter = Reporter::new(io::stdout().lock(), config.verbosity);

    let comparison = match compare_files(&cli.source, &cli.target, &config, &mut reporter) {
        Ok(comparison) => comparison,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_cache_overflow() {
                eprintln!(
                    "A window of {} ticks cannot bound the reordering in '{}'; try a larger --cache-size",
                    config.cache_size,
                    cli.target.display()
                );
            }
            process::exit(1);
        }
    };

    if let Err(e) = reporter.finish(&comparison) {
        eprintln!("Error writing report: {e}");
        process::exit(1);
    }

    if comparison.aggregate == Aggregate::Unresolved && !config.allow_empty {
        eprintln!(
            "No ticks found in '{}'; pass --allow-empty to accept an empty source",
            cli.source.display()
        );
    }

    if !comparison.succeeded(config.allow_empty) {
        process::exit(1);
    }
}
