//! Record-by-record comparison of a source log against a target log.
//!
//! Three modes, all pulling through `RecordCursor`:
//!
//! - `exact`: lockstep. Step `i` compares source record `i` with target
//!   record `i`; a missing target fails. Target records past the end of the
//!   source are never read.
//! - `cached`: the target is read through a sliding window of
//!   `cache_size` records. Each source record consumes the first equal
//!   cached record, so reordering within the window is tolerated.
//! - `exhaustive`: the target is loaded once, and each source record
//!   passes if any target record equals it. Target records are not
//!   consumed.
//!
//! A mismatch is a failed verdict, never an error. Errors are reserved for
//! missing inputs, read failures, and cache overflow.

use std::path::Path;

use tracing::{debug, info};

use crate::cache::BoundedCache;
use crate::config::{CompareConfig, Mode};
use crate::cursor::RecordCursor;
use crate::error::CompareError;
use crate::extractor::RecordExtractor;
use crate::record::Record;

/// Verdict for one source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

/// Overall result of a run.
///
/// Starts `Unresolved`; once failed it stays failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    #[default]
    Unresolved,
    Pass,
    Fail,
}

impl Aggregate {
    pub fn fold(self, outcome: Outcome) -> Self {
        match (self, outcome) {
            (Aggregate::Fail, _) | (_, Outcome::Fail) => Aggregate::Fail,
            (_, Outcome::Pass) => Aggregate::Pass,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Unresolved => "UNRESOLVED",
            Aggregate::Pass => "PASS",
            Aggregate::Fail => "FAIL",
        }
    }
}

/// One compared record.
///
/// `None` on either side means that side had no record to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictEntry {
    /// 1-based position in the source stream.
    pub index: usize,
    pub outcome: Outcome,
    pub source_line: Option<usize>,
    pub target_line: Option<usize>,
}

/// Receives verdicts as they are produced.
pub trait VerdictSink {
    fn on_verdict(&mut self, entry: &VerdictEntry);
}

/// Sink that discards everything.
pub struct NullSink;

impl VerdictSink for NullSink {
    fn on_verdict(&mut self, _entry: &VerdictEntry) {}
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub mode: Mode,
    pub aggregate: Aggregate,
    pub passed: usize,
    pub failed: usize,
    pub entries: Vec<VerdictEntry>,
}

impl Comparison {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            aggregate: Aggregate::Unresolved,
            passed: 0,
            failed: 0,
            entries: Vec::new(),
        }
    }

    /// Whether the run counts as a success for exit-code purposes.
    pub fn succeeded(&self, allow_empty: bool) -> bool {
        match self.aggregate {
            Aggregate::Pass => true,
            Aggregate::Unresolved => allow_empty,
            Aggregate::Fail => false,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Per-run state shared by the three modes.
struct Run<'a> {
    sink: &'a mut dyn VerdictSink,
    comparison: Comparison,
}

impl Run<'_> {
    fn record(&mut self, outcome: Outcome, source: &Record, target_line: Option<usize>) {
        let entry = VerdictEntry {
            index: self.comparison.total() + 1,
            outcome,
            source_line: Some(source.line_number()),
            target_line,
        };
        match outcome {
            Outcome::Pass => self.comparison.passed += 1,
            Outcome::Fail => self.comparison.failed += 1,
        }
        self.comparison.aggregate = self.comparison.aggregate.fold(outcome);
        self.sink.on_verdict(&entry);
        self.comparison.entries.push(entry);
    }
}

/// Compare two log files.
///
/// Both files are opened, and so checked to be regular files, before any
/// record is compared.
pub fn compare_files(
    source: &Path,
    target: &Path,
    config: &CompareConfig,
    sink: &mut dyn VerdictSink,
) -> Result<Comparison, CompareError> {
    config.validate()?;
    let source = RecordExtractor::open(source, &config.markers, &config.ignore)?;
    let target = RecordExtractor::open(target, &config.markers, &config.ignore)?;
    run_comparison(source, target, config, sink)
}

/// Compare two record streams with the configured mode.
pub fn compare_streams<S, T>(
    source: S,
    target: T,
    config: &CompareConfig,
    sink: &mut dyn VerdictSink,
) -> Result<Comparison, CompareError>
where
    S: Iterator<Item = Result<Record, CompareError>>,
    T: Iterator<Item = Result<Record, CompareError>>,
{
    config.validate()?;
    run_comparison(source, target, config, sink)
}

fn run_comparison<S, T>(
    source: S,
    target: T,
    config: &CompareConfig,
    sink: &mut dyn VerdictSink,
) -> Result<Comparison, CompareError>
where
    S: Iterator<Item = Result<Record, CompareError>>,
    T: Iterator<Item = Result<Record, CompareError>>,
{
    let mut source = RecordCursor::new(source);
    let mut target = RecordCursor::new(target);
    let mut run = Run {
        sink,
        comparison: Comparison::new(config.mode),
    };

    match config.mode {
        Mode::Exact => compare_exact(&mut source, &mut target, config, &mut run)?,
        Mode::Cached => compare_cached(&mut source, &mut target, config, &mut run)?,
        Mode::Exhaustive => compare_exhaustive(&mut source, &mut target, config, &mut run)?,
    }

    let comparison = run.comparison;
    info!(
        mode = %comparison.mode,
        result = comparison.aggregate.name(),
        passed = comparison.passed,
        failed = comparison.failed,
        "comparison finished"
    );
    Ok(comparison)
}

fn compare_exact<S, T>(
    source: &mut RecordCursor<S>,
    target: &mut RecordCursor<T>,
    config: &CompareConfig,
    run: &mut Run<'_>,
) -> Result<(), CompareError>
where
    S: Iterator<Item = Result<Record, CompareError>>,
    T: Iterator<Item = Result<Record, CompareError>>,
{
    while let Some(src) = source.try_next()? {
        let tgt = target.try_next()?;
        let outcome = match &tgt {
            Some(tgt) if config.ignore.records_equal(&src, tgt) => Outcome::Pass,
            _ => Outcome::Fail,
        };
        run.record(outcome, &src, tgt.as_ref().map(Record::line_number));
    }
    Ok(())
}

fn compare_cached<S, T>(
    source: &mut RecordCursor<S>,
    target: &mut RecordCursor<T>,
    config: &CompareConfig,
    run: &mut Run<'_>,
) -> Result<(), CompareError>
where
    S: Iterator<Item = Result<Record, CompareError>>,
    T: Iterator<Item = Result<Record, CompareError>>,
{
    let mut cache = BoundedCache::new(config.cache_capacity()?);

    for _ in 0..config.warm_up_len() {
        match target.try_next()? {
            Some(record) => cache.push(record)?,
            None => break,
        }
    }
    debug!(
        cached = cache.len(),
        capacity = cache.capacity(),
        "cache warm-up done"
    );

    let mut target_exhausted = false;
    while let Some(src) = source.try_next()? {
        if target.has_more()
            && let Some(record) = target.try_next()?
        {
            if cache.is_full()
                && let Some(evicted) = cache.evict_oldest()
            {
                debug!(line = evicted.line_number(), "evicted unmatched target tick");
            }
            cache.push(record)?;
        } else if !target_exhausted {
            target_exhausted = true;
            debug!(pulled = target.pulled(), "target exhausted");
        }

        let hit = cache.member_search(&src, &config.ignore);
        let outcome = if hit.is_some() {
            Outcome::Pass
        } else {
            debug!(line = src.line_number(), "no cached match");
            Outcome::Fail
        };
        run.record(outcome, &src, hit.as_ref().map(Record::line_number));
    }
    Ok(())
}

fn compare_exhaustive<S, T>(
    source: &mut RecordCursor<S>,
    target: &mut RecordCursor<T>,
    config: &CompareConfig,
    run: &mut Run<'_>,
) -> Result<(), CompareError>
where
    S: Iterator<Item = Result<Record, CompareError>>,
    T: Iterator<Item = Result<Record, CompareError>>,
{
    let targets = target.collect_remaining()?;
    debug!(loaded = targets.len(), "target loaded");

    while let Some(src) = source.try_next()? {
        let hit = targets
            .iter()
            .find(|tgt| config.ignore.records_equal(&src, tgt));
        let outcome = if hit.is_some() {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        run.record(outcome, &src, hit.map(Record::line_number));
    }
    Ok(())
}
