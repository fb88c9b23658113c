//! Bounded sliding window of unmatched target records.
//!
//! The window holds at most `capacity` records in normal operation. A push
//! may leave it one over capacity; anything past that is a structural
//! failure reported as `CompareError::CacheOverflow`.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use tracing::warn;

use crate::error::CompareError;
use crate::record::{IgnoreSet, Record};

/// Upper bound on the up-front allocation; larger windows grow on demand.
const PREALLOC_LIMIT: usize = 1024;

#[derive(Debug)]
pub struct BoundedCache {
    entries: VecDeque<Record>,
    capacity: NonZeroUsize,
}

impl BoundedCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.get().min(PREALLOC_LIMIT)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// At or above capacity; the next admission should evict first.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity.get()
    }

    /// Append at the tail.
    ///
    /// The record is kept even on overflow; the error tells the caller the
    /// window can no longer bound the stream.
    pub fn push(&mut self, record: Record) -> Result<(), CompareError> {
        self.entries.push_back(record);
        let len = self.entries.len();
        if len - 1 > self.capacity.get() {
            warn!(len, capacity = self.capacity.get(), "tick cache overflow");
            return Err(CompareError::CacheOverflow {
                capacity: self.capacity.get(),
                len,
            });
        }
        Ok(())
    }

    /// Remove and return the first cached record equal to `probe`.
    ///
    /// A hit always consumes the entry, so a cached record can satisfy at
    /// most one probe.
    pub fn member_search(&mut self, probe: &Record, ignore: &IgnoreSet) -> Option<Record> {
        let pos = self
            .entries
            .iter()
            .position(|cached| ignore.records_equal(cached, probe))?;
        self.entries.remove(pos)
    }

    /// Drop the head entry.
    pub fn evict_oldest(&mut self) -> Option<Record> {
        self.entries.pop_front()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter()
    }
}
