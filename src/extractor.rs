//! Lazy record extraction from a harness log.
//!
//! Log format:
//! ```text
//! subscriber started          <- preamble before the first marker, skipped
//! MESSAGE                     <- marker: opens a record
//! symbol ACME
//! price  10.25
//!
//! MESSAGE                     <- closes the previous record, opens the next
//! symbol ACME
//! price  10.50
//! ```
//!
//! - A line exactly equal to one of the accepted markers starts a record
//! - Blank lines are skipped everywhere
//! - Other lines inside a record are `key value...`, split on whitespace
//! - The record open at end of input is emitted

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::mem;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CompareError;
use crate::record::{IgnoreSet, Record};

/// Marker used when none is configured.
pub const DEFAULT_MARKER: &str = "MESSAGE";

/// Label used in errors for extractors built over in-memory readers.
const READER_LABEL: &str = "<reader>";

enum ParseState {
    Idle,
    Accumulating(Record),
}

/// Forward-only stream of records read from one log.
///
/// Yields `Err` once if the underlying read fails, then ends.
pub struct RecordExtractor<R> {
    lines: io::Lines<R>,
    path: PathBuf,
    markers: Vec<String>,
    ignore: IgnoreSet,
    state: ParseState,
    line_number: usize,
    finished: bool,
}

impl RecordExtractor<BufReader<File>> {
    /// Open a log file for extraction.
    ///
    /// Fails with `FileNotFound` unless `path` is an existing regular file.
    pub fn open(path: &Path, markers: &[String], ignore: &IgnoreSet) -> Result<Self, CompareError> {
        if !path.is_file() {
            return Err(CompareError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened log");

        let mut extractor = Self::from_reader(BufReader::new(file), markers, ignore);
        extractor.path = path.to_path_buf();
        Ok(extractor)
    }
}

impl<R: BufRead> RecordExtractor<R> {
    /// Extract records from any buffered reader.
    pub fn from_reader(reader: R, markers: &[String], ignore: &IgnoreSet) -> Self {
        Self {
            lines: reader.lines(),
            path: PathBuf::from(READER_LABEL),
            markers: markers.to_vec(),
            ignore: ignore.clone(),
            state: ParseState::Idle,
            line_number: 0,
            finished: false,
        }
    }

    fn is_marker(&self, line: &str) -> bool {
        self.markers.iter().any(|m| m == line)
    }
}

impl<R: BufRead> Iterator for RecordExtractor<R> {
    type Item = Result<Record, CompareError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    self.finished = true;
                    return Some(Err(CompareError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
                None => {
                    self.finished = true;
                    return match mem::replace(&mut self.state, ParseState::Idle) {
                        ParseState::Accumulating(record) => Some(Ok(record)),
                        ParseState::Idle => None,
                    };
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            if self.is_marker(&line) {
                let opened = ParseState::Accumulating(Record::new(self.line_number));
                if let ParseState::Accumulating(closed) = mem::replace(&mut self.state, opened) {
                    return Some(Ok(closed));
                }
                continue;
            }

            if let ParseState::Accumulating(record) = &mut self.state {
                record.absorb_line(&line, &self.ignore);
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordExtractor<R> {}
