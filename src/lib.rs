//! # tick-compare
//!
//! Checks that two free-text tick logs, captured by independent
//! publish/subscribe test harnesses, describe the same sequence of messages.
//!
//! ## Overview
//!
//! - **Records**: each log is split into ticks at marker lines; every other
//!   line is a `key value...` field
//! - **Ignore set**: fields such as timestamps that legitimately differ are
//!   dropped before comparison
//! - **Modes**: `exact` (lockstep), `cached` (sliding window, tolerates
//!   bounded reordering), `exhaustive` (any order, no consumption)
//! - **Aggregate**: the run passes only if every compared tick passes
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use tick_compare::{Aggregate, CompareConfig, Mode, NullSink, RecordExtractor, compare_streams};
//!
//! let config = CompareConfig::new(Mode::Cached).with_cache_size(4);
//! let source = "MESSAGE\nprice 10\nMESSAGE\nprice 11\n";
//! let target = "MESSAGE\nprice 11\nMESSAGE\nprice 10\n";
//!
//! let result = compare_streams(
//!     RecordExtractor::from_reader(Cursor::new(source), &config.markers, &config.ignore),
//!     RecordExtractor::from_reader(Cursor::new(target), &config.markers, &config.ignore),
//!     &config,
//!     &mut NullSink,
//! )
//! .unwrap();
//!
//! assert_eq!(result.aggregate, Aggregate::Pass);
//! ```

pub mod cache;
pub mod compare;
pub mod config;
pub mod cursor;
pub mod error;
pub mod extractor;
pub mod record;
pub mod report;

pub use cache::BoundedCache;
pub use compare::{
    Aggregate, Comparison, NullSink, Outcome, VerdictEntry, VerdictSink, compare_files,
    compare_streams,
};
pub use config::{CompareConfig, DEFAULT_CACHE_SIZE, Mode, Verbosity};
pub use cursor::RecordCursor;
pub use error::CompareError;
pub use extractor::{DEFAULT_MARKER, RecordExtractor};
pub use record::{FieldMap, IgnoreSet, Record};
pub use report::{Reporter, format_summary, format_verdict};
