//! Pull cursor over a record stream.
//!
//! Every comparison mode walks its inputs through a `RecordCursor`, so
//! exhaustion and read failures are handled the same way everywhere.

use std::iter::Peekable;

use crate::error::CompareError;
use crate::record::Record;

/// Cursor with a has-more / try-next contract over fallible records.
pub struct RecordCursor<I: Iterator<Item = Result<Record, CompareError>>> {
    inner: Peekable<I>,
    pulled: usize,
}

impl<I> RecordCursor<I>
where
    I: Iterator<Item = Result<Record, CompareError>>,
{
    pub fn new(stream: I) -> Self {
        Self {
            inner: stream.peekable(),
            pulled: 0,
        }
    }

    /// Whether another item (record or error) is waiting.
    pub fn has_more(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    /// Take the next record; `Ok(None)` once the stream is exhausted.
    pub fn try_next(&mut self) -> Result<Option<Record>, CompareError> {
        let next = self.inner.next().transpose()?;
        if next.is_some() {
            self.pulled += 1;
        }
        Ok(next)
    }

    /// Records handed out so far.
    pub fn pulled(&self) -> usize {
        self.pulled
    }

    /// Drain the rest of the stream into memory.
    pub fn collect_remaining(&mut self) -> Result<Vec<Record>, CompareError> {
        let mut records = Vec::new();
        while let Some(record) = self.try_next()? {
            records.push(record);
        }
        Ok(records)
    }
}
