//! Tick records and the ignore-aware equality contract.
//!
//! A record is one message as logged by a harness: a set of fields keyed by
//! name, each holding the whitespace-separated tokens that followed the key.
//!
//! ```text
//! MESSAGE
//! symbol  ACME
//! price   10.25
//! size    500
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Field key → value tokens, ordered by key.
pub type FieldMap = BTreeMap<String, Vec<String>>;

/// A parsed tick.
///
/// Equality covers `fields` only; `line_number` is carried for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Record {
    line_number: usize,
    fields: FieldMap,
}

impl Record {
    /// Create an empty record opened at `line_number` (1-based).
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            fields: FieldMap::new(),
        }
    }

    /// Add a field, builder style.
    pub fn with_field(mut self, key: &str, values: &[&str]) -> Self {
        self.set_field(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Line of the marker that opened this record.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&[String]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Store a field. A repeated key overwrites the earlier value.
    pub(crate) fn set_field(&mut self, key: String, values: Vec<String>) {
        self.fields.insert(key, values);
    }

    /// Tokenize a `key value...` line into this record.
    ///
    /// Returns `false` when the line was dropped: blank, or keyed by an
    /// ignored field.
    pub(crate) fn absorb_line(&mut self, line: &str, ignore: &IgnoreSet) -> bool {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            return false;
        };
        if ignore.contains(key) {
            return false;
        }
        self.set_field(key.to_string(), tokens.map(str::to_string).collect());
        true
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Record {}

/// Field keys excluded from storage and from comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Structural equality of two records, skipping ignored keys.
    ///
    /// Records read by the extractor never hold ignored keys, but records
    /// built elsewhere may, so the filter is applied here as well.
    pub fn records_equal(&self, a: &Record, b: &Record) -> bool {
        if self.is_empty() {
            return a == b;
        }
        self.visible(a).eq(self.visible(b))
    }

    fn visible<'a>(
        &'a self,
        record: &'a Record,
    ) -> impl Iterator<Item = (&'a String, &'a Vec<String>)> + 'a {
        record
            .fields
            .iter()
            .filter(move |(key, _)| !self.contains(key))
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
