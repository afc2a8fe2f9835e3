//! Result types returned by search and replace batches.
//!
//! All of these are plain owned values: once a summary is returned the engine
//! never touches it again, and a host can hold it across later index
//! mutations without observing changes.

use serde::{Deserialize, Serialize};

/// The lines adjacent to a match. Empty strings at file boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineContext {
    pub before: String,
    pub after: String,
}

/// One located occurrence of the query on a single line of a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Path of the file containing the match.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column within the line.
    pub column: usize,
    /// The full line containing the match.
    pub text: String,
    /// The matched substring.
    pub matched: String,
    /// Adjacent lines for display context.
    pub context: LineContext,
    /// The full line, or a windowed excerpt with `...` markers when the line
    /// exceeds the preview width.
    pub preview: String,
}

/// The outcome of one search batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSummary {
    /// The query that was searched.
    pub query: String,
    /// Number of results returned (after any `max_results` cap).
    pub total_results: usize,
    /// Number of distinct files contributing at least one returned result.
    pub total_files: usize,
    /// Wall-clock duration of the batch in milliseconds.
    pub duration_ms: u64,
    /// The matches, in (file order, line ascending, column ascending) order.
    pub results: Vec<SearchMatch>,
    /// True iff a further match was found beyond the `max_results` cap. A
    /// lower bound: more matches may exist past the first one discarded.
    pub has_more: bool,
}

impl SearchSummary {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// The outcome of one attempted replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceResult {
    pub file: String,
    /// 1-based line number of the originating match.
    pub line: usize,
    /// 1-based byte column of the originating match.
    pub column: usize,
    /// The matched text that was (or would have been) replaced.
    pub original_text: String,
    /// The text inserted, after any capture expansion.
    pub new_text: String,
    pub success: bool,
    /// Failure reason when `success` is false.
    pub error: Option<String>,
}

/// The outcome of one replace batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceSummary {
    pub query: String,
    pub replacement: String,
    /// Count of successful replacements.
    pub total_replacements: usize,
    /// Count of files with at least one successful replacement.
    pub total_files: usize,
    /// Wall-clock duration in milliseconds, search included.
    pub duration_ms: u64,
    /// Per-match outcomes, in (file order, line ascending, column ascending)
    /// order.
    pub results: Vec<ReplaceResult>,
    /// File-level failures that produced no per-match results, e.g. a file
    /// removed from the index between search and apply.
    pub errors: Vec<String>,
}

impl ReplaceSummary {
    /// Recomputes the aggregate counters from the per-match results.
    pub(crate) fn tally(&mut self) {
        self.total_replacements = self.results.iter().filter(|r| r.success).count();
        let mut files: Vec<&str> = self
            .results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.file.as_str())
            .collect();
        files.dedup();
        self.total_files = files.len();
    }
}
