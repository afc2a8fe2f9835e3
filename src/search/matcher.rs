//! Query compilation: one matching procedure per set of search options.

use regex::{Regex, RegexBuilder};

use crate::config::SearchOptions;
use crate::errors::{EngineError, EngineResult};

/// Strategy for locating matches within a line.
#[derive(Debug, Clone)]
enum MatchStrategy {
    /// Case-sensitive literal scan. Fast path for plain queries.
    Literal(String),
    /// Compiled regex: regex queries, case-insensitive queries, and
    /// whole-word queries all land here.
    Pattern(Regex),
}

/// A compiled query, ready to run against any number of lines.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    strategy: MatchStrategy,
}

impl QueryMatcher {
    /// Compiles the query described by `options`.
    ///
    /// In regex mode the query text is compiled exactly as supplied, so an
    /// invalid pattern surfaces as [`EngineError::InvalidPattern`]. Literal
    /// mode cannot fail: metacharacters are escaped before compilation.
    pub fn compile(options: &SearchOptions) -> EngineResult<Self> {
        if options.use_regex {
            let regex = RegexBuilder::new(&options.query)
                .case_insensitive(!options.case_sensitive)
                .build()
                .map_err(|e| EngineError::invalid_pattern(options.query.as_str(), e.to_string()))?;
            return Ok(Self {
                strategy: MatchStrategy::Pattern(regex),
            });
        }

        if options.case_sensitive && !options.whole_word {
            return Ok(Self {
                strategy: MatchStrategy::Literal(options.query.clone()),
            });
        }

        let mut pattern = regex::escape(&options.query);
        if options.whole_word {
            pattern = format!(r"\b{pattern}\b");
        }
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| EngineError::invalid_pattern(options.query.as_str(), e.to_string()))?;
        Ok(Self {
            strategy: MatchStrategy::Pattern(regex),
        })
    }

    /// Every non-overlapping match in `line`, as byte ranges, left to right.
    ///
    /// Zero-width matches are safe: both `find_iter` and `match_indices`
    /// advance the cursor past an empty match, so the scan always terminates
    /// with a finite list.
    pub fn find_in_line(&self, line: &str) -> Vec<(usize, usize)> {
        match &self.strategy {
            MatchStrategy::Literal(needle) => line
                .match_indices(needle.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
            MatchStrategy::Pattern(regex) => regex
                .find_iter(line)
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }
}
