//! Bounded, most-recent-first logs of past searches and replacements.

use std::collections::VecDeque;

use crate::config::{ReplaceOptions, SearchOptions};

/// Maximum entries kept per history list.
const HISTORY_CAPACITY: usize = 50;
/// Maximum suggestions returned for a partial query.
const MAX_SUGGESTIONS: usize = 10;

/// Two independent bounded lists: one for searches, one for replacements.
/// Both are most-recent-first with FIFO eviction at capacity.
#[derive(Debug, Default)]
pub struct QueryHistory {
    searches: VecDeque<SearchOptions>,
    replaces: VecDeque<ReplaceOptions>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_search(&mut self, options: SearchOptions) {
        self.searches.push_front(options);
        if self.searches.len() > HISTORY_CAPACITY {
            self.searches.pop_back();
        }
    }

    pub fn record_replace(&mut self, options: ReplaceOptions) {
        self.replaces.push_front(options);
        if self.replaces.len() > HISTORY_CAPACITY {
            self.replaces.pop_back();
        }
    }

    /// Past searches, most recent first.
    pub fn recent_searches(&self) -> impl Iterator<Item = &SearchOptions> {
        self.searches.iter()
    }

    /// Past replacements, most recent first.
    pub fn recent_replaces(&self) -> impl Iterator<Item = &ReplaceOptions> {
        self.replaces.iter()
    }

    /// Queries from both histories containing `partial` (case-insensitively),
    /// deduplicated by exact query string, most recently seen first, capped
    /// at ten. Search history is scanned before replace history.
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        let needle = partial.to_lowercase();
        let mut out: Vec<String> = Vec::new();

        let candidates = self
            .searches
            .iter()
            .map(|o| o.query.as_str())
            .chain(self.replaces.iter().map(|o| o.search.query.as_str()));

        for query in candidates {
            if out.len() == MAX_SUGGESTIONS {
                break;
            }
            if query.to_lowercase().contains(&needle) && !out.iter().any(|q| q == query) {
                out.push(query.to_string());
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.searches.clear();
        self.replaces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(query: &str) -> SearchOptions {
        SearchOptions::literal(query)
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = QueryHistory::new();
        for i in 0..60 {
            history.record_search(search(&format!("query-{i}")));
        }

        let queries: Vec<&str> = history.recent_searches().map(|o| o.query.as_str()).collect();
        assert_eq!(queries.len(), 50);
        assert_eq!(queries[0], "query-59");
        assert_eq!(queries[49], "query-10"); // 0..=9 evicted
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = QueryHistory::new();
        history.record_search(search("first"));
        history.record_search(search("second"));

        let queries: Vec<&str> = history.recent_searches().map(|o| o.query.as_str()).collect();
        assert_eq!(queries, ["second", "first"]);
    }

    #[test]
    fn test_suggestions_substring_case_insensitive() {
        let mut history = QueryHistory::new();
        history.record_search(search("FooBar"));
        history.record_search(search("baz"));

        assert_eq!(history.suggestions("oba"), ["FooBar"]);
        assert_eq!(history.suggestions("OBA"), ["FooBar"]);
        assert!(history.suggestions("zzz").is_empty());
    }

    #[test]
    fn test_suggestions_merge_and_dedupe() {
        let mut history = QueryHistory::new();
        history.record_search(search("alpha"));
        history.record_replace(ReplaceOptions::new(search("alpha"), "beta"));
        history.record_replace(ReplaceOptions::new(search("alphabet"), "x"));

        let suggestions = history.suggestions("alpha");
        assert_eq!(suggestions, ["alpha", "alphabet"]);
    }

    #[test]
    fn test_suggestions_capped_at_ten() {
        let mut history = QueryHistory::new();
        for i in 0..15 {
            history.record_search(search(&format!("item-{i}")));
        }
        assert_eq!(history.suggestions("item").len(), 10);
    }

    #[test]
    fn test_clear() {
        let mut history = QueryHistory::new();
        history.record_search(search("a"));
        history.record_replace(ReplaceOptions::new(search("b"), "c"));
        history.clear();
        assert_eq!(history.recent_searches().count(), 0);
        assert_eq!(history.recent_replaces().count(), 0);
        assert!(history.suggestions("").is_empty());
    }
}
