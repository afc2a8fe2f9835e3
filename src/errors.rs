//! Error types for engine operations.
//!
//! Batch entry points never surface per-file or per-match failures as `Err`:
//! those are folded into the returned summaries with explicit success flags.
//! The variants here describe the individual failures recorded inside a
//! summary, plus the one programmer-misuse error (`IndexNotInitialized`) that
//! a public entry point is allowed to return.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while searching or replacing.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The query could not be compiled as a regular expression.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A replacement targeted a file that is no longer in the index.
    #[error("File not found in index: {0}")]
    FileNotIndexed(String),

    /// A single match could not be applied to its file's content.
    #[error("Replacement failed at {path}:{line}:{column}: {reason}")]
    ReplacementFailed {
        path: String,
        line: usize,
        column: usize,
        reason: String,
    },

    /// `replace` was called before the index was ever populated.
    #[error("Index not initialized: call index_files before replace")]
    IndexNotInitialized,
}

impl EngineError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn file_not_indexed(path: impl Into<String>) -> Self {
        Self::FileNotIndexed(path.into())
    }

    pub fn replacement_failed(
        path: impl Into<String>,
        line: usize,
        column: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReplacementFailed {
            path: path.into(),
            line,
            column,
            reason: reason.into(),
        }
    }
}
