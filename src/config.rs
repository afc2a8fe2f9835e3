//! Search and replace options.
//!
//! Options are caller-owned values. The engine retains clones only inside its
//! bounded history, and all fields are serde-enabled so a host can persist a
//! session or bridge options across a process boundary.

use serde::{Deserialize, Serialize};

/// Options controlling a single search batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// The query text: a literal string, or a regular expression when
    /// `use_regex` is set.
    pub query: String,

    /// Whether matching distinguishes case.
    #[serde(default)]
    pub case_sensitive: bool,

    /// Whether the query must match at word boundaries on both sides.
    #[serde(default)]
    pub whole_word: bool,

    /// Whether the query is interpreted as a regular expression.
    #[serde(default)]
    pub use_regex: bool,

    /// Glob patterns a file must match at least one of (empty = all files).
    /// Only `*` and `?` are wildcards; matching is case-insensitive and `*`
    /// crosses path separators.
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Glob patterns that exclude a file outright. Exclude wins over include.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Upper bound on returned results. `None` means unbounded.
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl SearchOptions {
    /// A case-insensitive literal search with no file filtering.
    pub fn literal(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            max_results: None,
        }
    }
}

/// Options controlling a replace batch: a search plus the replacement text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOptions {
    /// The search half of the operation.
    #[serde(flatten)]
    pub search: SearchOptions,

    /// The text inserted in place of each match. In regex mode, `$1`/`$name`
    /// capture references are expanded.
    pub replacement: String,

    /// Whether the host intends to confirm each match interactively. The
    /// engine records this but never prompts; hosts drive confirmation via
    /// `preview_replace`.
    #[serde(default)]
    pub confirm_each: bool,
}

impl ReplaceOptions {
    pub fn new(search: SearchOptions, replacement: impl Into<String>) -> Self {
        Self {
            search,
            replacement: replacement.into(),
            confirm_each: false,
        }
    }
}
