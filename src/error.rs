//! Error type for structural faults.
//!
//! A record that does not match is not an error: it is a failed verdict
//! folded into the aggregate. Only the conditions below abort a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    /// Invalid invocation that made it past argument parsing.
    #[error("usage: {0}")]
    Usage(String),

    /// An input path is missing or is not a regular file.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The sliding window grew past its hard ceiling of `capacity + 1`.
    #[error("cache overflow: {len} records held with capacity {capacity}")]
    CacheOverflow { capacity: usize, len: usize },

    /// Reading an existing input failed.
    #[error("error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompareError {
    /// True for the overflow abort, which callers must not retry blindly.
    pub fn is_cache_overflow(&self) -> bool {
        matches!(self, CompareError::CacheOverflow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_not_found() {
        let err = CompareError::FileNotFound {
            path: PathBuf::from("/tmp/missing.log"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.log");
        assert!(!err.is_cache_overflow());
    }

    #[test]
    fn test_display_cache_overflow() {
        let err = CompareError::CacheOverflow {
            capacity: 2,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "cache overflow: 4 records held with capacity 2"
        );
        assert!(err.is_cache_overflow());
    }
}
