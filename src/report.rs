//! Diagnostic output.
//!
//! Line format, one per compared record:
//! ```text
//! PASS  tick 1: source line 1, target line 1
//! FAIL  tick 2: source line 4, target line absent
//! RESULT FAIL: 1 passed, 1 failed (exact)
//! ```

use std::io::{self, Write};

use crate::compare::{Comparison, Outcome, VerdictEntry, VerdictSink};
use crate::config::Verbosity;

/// Writes verdict lines and the closing summary to `out`.
///
/// A write failure does not stop the comparison; the first one is kept and
/// returned by `finish`.
pub struct Reporter<W: Write> {
    out: W,
    verbosity: Verbosity,
    error: Option<io::Error>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self {
            out,
            verbosity,
            error: None,
        }
    }

    fn shows(&self, outcome: Outcome) -> bool {
        match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Failures => outcome == Outcome::Fail,
            Verbosity::All => true,
        }
    }

    /// Write the summary line and hand back the sink.
    pub fn finish(mut self, comparison: &Comparison) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.verbosity > Verbosity::Quiet {
            writeln!(self.out, "{}", format_summary(comparison))?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> VerdictSink for Reporter<W> {
    fn on_verdict(&mut self, entry: &VerdictEntry) {
        if self.error.is_some() || !self.shows(entry.outcome) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", format_verdict(entry)) {
            self.error = Some(err);
        }
    }
}

pub fn format_verdict(entry: &VerdictEntry) -> String {
    let verdict = match entry.outcome {
        Outcome::Pass => "PASS",
        Outcome::Fail => "FAIL",
    };
    format!(
        "{verdict}  tick {}: source line {}, target line {}",
        entry.index,
        line_or_absent(entry.source_line),
        line_or_absent(entry.target_line),
    )
}

pub fn format_summary(comparison: &Comparison) -> String {
    format!(
        "RESULT {}: {} passed, {} failed ({})",
        comparison.aggregate.name(),
        comparison.passed,
        comparison.failed,
        comparison.mode
    )
}

fn line_or_absent(line: Option<usize>) -> String {
    line.map_or_else(|| "absent".to_string(), |n| n.to_string())
}
