//! Typed engine errors.
//!
//! Mirrors the five error kinds the file processor and AST harvesters can
//! produce. These are always collected into an `ErrorLog`, never thrown —
//! see `processor` and `engine` for how callers accumulate them per file.

use std::path::PathBuf;
use thiserror::Error;

/// A single failure attributed to one input file.
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub kind: EngineError,
}

#[derive(Debug, Error, Clone)]
pub enum EngineError {
    #[error("parser rejected file: {0}")]
    ParseFailure(String),

    #[error("io failure: {0}")]
    Io(String),

    #[error("file size {size} exceeds limit {limit}")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("canceled")]
    Canceled,

    #[error("per-worker resource unavailable: {0}")]
    ResourceUnavailable(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

/// Thread-safe collection of per-file errors, appended under a lock as
/// workers finish (§5: "a mutex-guarded vector, appended under lock").
#[derive(Debug, Default)]
pub struct ErrorLog {
    errors: std::sync::Mutex<Vec<FileError>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, path: PathBuf, kind: EngineError) {
        self.errors
            .lock()
            .expect("error log mutex poisoned")
            .push(FileError { path, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().expect("error log mutex poisoned").is_empty()
    }

    /// Consume into `Some(errors)` iff at least one was recorded, matching
    /// the "non-null iff at least one error" contract in §4.1.
    pub fn into_option(self) -> Option<Vec<FileError>> {
        let errors = self.errors.into_inner().expect("error log mutex poisoned");
        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}
