//! Comparison settings.
//!
//! `CompareConfig` is built once (by the CLI or a test) and passed by
//! reference to the comparator and the reporter.

use std::fmt;
use std::num::NonZeroUsize;

use clap::ValueEnum;

use crate::error::CompareError;
use crate::extractor::DEFAULT_MARKER;
use crate::record::IgnoreSet;

pub const DEFAULT_CACHE_SIZE: usize = 10;

/// Matching algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Lockstep, one record from each side per step
    #[default]
    Exact,
    /// Sliding window over the target, each cached record matches once
    Cached,
    /// Full rescan of the target for every source record
    Exhaustive,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Exact => "exact",
            Mode::Cached => "cached",
            Mode::Exhaustive => "exhaustive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which diagnostic lines reach the report sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing; the caller reads the aggregate only.
    Quiet,
    /// Failed verdicts and the summary.
    #[default]
    Failures,
    /// Every verdict and the summary.
    All,
}

#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub mode: Mode,
    /// Window size, used by `Mode::Cached` only.
    pub cache_size: usize,
    pub ignore: IgnoreSet,
    /// Lines that open a record.
    pub markers: Vec<String>,
    pub verbosity: Verbosity,
    /// Count a run with zero verdicts as success.
    pub allow_empty: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            cache_size: DEFAULT_CACHE_SIZE,
            ignore: IgnoreSet::new(),
            markers: vec![DEFAULT_MARKER.to_string()],
            verbosity: Verbosity::default(),
            allow_empty: false,
        }
    }
}

impl CompareConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_markers(mut self, markers: Vec<String>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<(), CompareError> {
        self.cache_capacity()?;
        if self.markers.is_empty() {
            return Err(CompareError::Usage(
                "at least one record marker is required".to_string(),
            ));
        }
        if let Some(bad) = self.markers.iter().find(|m| m.trim().is_empty()) {
            return Err(CompareError::Usage(format!(
                "record marker {bad:?} is blank; blank lines are always skipped"
            )));
        }
        Ok(())
    }

    pub fn cache_capacity(&self) -> Result<NonZeroUsize, CompareError> {
        NonZeroUsize::new(self.cache_size)
            .ok_or_else(|| CompareError::Usage("cache size must be at least 1".to_string()))
    }

    /// Target records loaded before the cached comparison starts.
    pub fn warm_up_len(&self) -> usize {
        self.cache_size.div_ceil(2)
    }
}
