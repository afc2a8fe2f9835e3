//! The caller-owned search/replace engine.
//!
//! One [`SearchEngine`] value owns one file index, one history, and one set
//! of metrics. There is no shared module-level instance: independent sessions
//! construct independent engines and can never cross-contaminate. The
//! `&mut self` receivers on batch entry points and index mutators also make
//! interleaving a mutation with an in-flight batch over the same engine a
//! compile error rather than a documented hazard.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{ReplaceOptions, SearchOptions};
use crate::errors::{EngineError, EngineResult};
use crate::filters;
use crate::history::QueryHistory;
use crate::index::{FileEntry, FileIndex, FileSnapshot, IndexStats, UpdateOutcome};
use crate::metrics::EngineMetrics;
use crate::replace::apply_to_entry;
use crate::results::{ReplaceSummary, SearchMatch, SearchSummary};
use crate::search::matcher::QueryMatcher;
use crate::search::scan::scan_entry;

/// Invoked once per file scanned during a search, with
/// `(current_file_index, total_files, path)`. Must not block.
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// In-memory multi-file search and replace over host-supplied snapshots.
#[derive(Default)]
pub struct SearchEngine {
    index: FileIndex,
    history: QueryHistory,
    metrics: EngineMetrics,
    progress: Option<ProgressCallback>,
    indexed_once: bool,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that reports per-file scan progress through `callback`.
    /// The callback is injected at construction; it is not mutable shared
    /// state.
    pub fn with_progress(callback: ProgressCallback) -> Self {
        Self {
            progress: Some(callback),
            ..Self::default()
        }
    }

    // ---- index management -------------------------------------------------

    /// Replaces the entire index with the supplied snapshots. Entries failing
    /// the skip rule are silently excluded.
    pub fn index_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = (String, FileSnapshot)>,
    {
        let (stored, skipped) = self.index.index_files(files);
        self.indexed_once = true;
        let bytes = self.index.stats().total_bytes;
        self.metrics
            .record_indexed(stored as u64, skipped as u64, bytes as u64);
        info!(stored, skipped, "indexed files");
    }

    /// Swaps in new content for one file; content now failing the skip rule
    /// evicts the entry instead.
    pub fn update_file(&mut self, path: &str, content: impl Into<String>) -> UpdateOutcome {
        self.index.update_file(path, content)
    }

    pub fn remove_file(&mut self, path: &str) {
        self.index.remove_file(path);
    }

    /// The current snapshot for one file. The returned `Arc` stays coherent
    /// across later index mutations.
    pub fn file(&self, path: &str) -> Option<Arc<FileEntry>> {
        self.index.entry(path)
    }

    /// All current snapshots in index insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Arc<FileEntry>> {
        self.index.entries()
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    // ---- history ----------------------------------------------------------

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Query suggestions for a partial input, drawn from both histories.
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        self.history.suggestions(partial)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ---- search -----------------------------------------------------------

    /// Runs one search batch. Infallible: a pattern that fails to compile
    /// yields zero results (warn-logged) rather than an error, and a file's
    /// scan can no longer fail once its snapshot is in the index.
    pub fn search(&mut self, options: &SearchOptions) -> SearchSummary {
        let started = Instant::now();

        if options.query.is_empty() {
            debug!("empty query, returning empty summary");
            return SearchSummary::empty(options.query.as_str());
        }

        self.history.record_search(options.clone());

        let mut summary = SearchSummary::empty(options.query.as_str());
        match QueryMatcher::compile(options) {
            Ok(matcher) => {
                let eligible = filters::files_to_search(&self.index, options);
                self.scan_files(&eligible, &matcher, options.max_results, &mut summary);
            }
            Err(err) => {
                warn!(%err, "query failed to compile, no files searched");
            }
        }

        summary.total_results = summary.results.len();
        summary.duration_ms = started.elapsed().as_millis() as u64;
        self.metrics.record_search(summary.total_results as u64);

        info!(
            query = %options.query,
            results = summary.total_results,
            files = summary.total_files,
            has_more = summary.has_more,
            duration_ms = summary.duration_ms,
            "search complete"
        );
        summary
    }

    fn scan_files(
        &self,
        eligible: &[Arc<FileEntry>],
        matcher: &QueryMatcher,
        max_results: Option<usize>,
        summary: &mut SearchSummary,
    ) {
        let total = eligible.len();
        for (file_index, entry) in eligible.iter().enumerate() {
            if let Some(callback) = &self.progress {
                callback(file_index, total, &entry.path);
            }

            let before = summary.results.len();
            let remaining = max_results.map(|limit| limit - before);
            let hit_cap = scan_entry(entry, matcher, remaining, &mut summary.results);
            if summary.results.len() > before {
                summary.total_files += 1;
            }
            if hit_cap {
                summary.has_more = true;
                break;
            }
        }
    }

    // ---- replace ----------------------------------------------------------

    /// Runs one replace batch: re-searches for the authoritative match set,
    /// applies each file's matches in descending position order, and commits
    /// updated snapshots back into the index.
    ///
    /// Returns `Err` only for programmer misuse (no `index_files` call ever
    /// made); per-file and per-match failures are folded into the summary.
    pub fn replace(&mut self, options: &ReplaceOptions) -> EngineResult<ReplaceSummary> {
        self.replace_inner(options, true)
    }

    /// Identical to [`Self::replace`] but commits nothing: the summary shows
    /// what a replace would do. Hosts honoring `confirm_each` drive their
    /// per-match confirmation from this.
    pub fn preview_replace(&mut self, options: &ReplaceOptions) -> EngineResult<ReplaceSummary> {
        self.replace_inner(options, false)
    }

    fn replace_inner(&mut self, options: &ReplaceOptions, commit: bool) -> EngineResult<ReplaceSummary> {
        if !self.indexed_once {
            return Err(EngineError::IndexNotInitialized);
        }

        let started = Instant::now();
        self.history.record_replace(options.clone());

        let located = self.search(&options.search);

        let mut summary = ReplaceSummary {
            query: options.search.query.clone(),
            replacement: options.replacement.clone(),
            ..Default::default()
        };

        for (path, matches) in partition_by_file(&located.results) {
            let Some(entry) = self.index.entry(path) else {
                let err = EngineError::file_not_indexed(path);
                warn!(%err, "file dropped between search and replace");
                summary.errors.push(err.to_string());
                continue;
            };

            let applied = apply_to_entry(&entry, matches, options);
            if commit {
                if let Some(new_content) = applied.new_content {
                    // One atomic swap per file; the skip rule is reapplied,
                    // so content grown past the size cap is evicted.
                    self.index.update_file(path, new_content);
                }
            }
            summary.results.extend(applied.results);
        }

        summary.tally();
        summary.duration_ms = started.elapsed().as_millis() as u64;
        let failed = summary.results.len() - summary.total_replacements;
        self.metrics
            .record_replacements(summary.total_replacements as u64, failed as u64);

        info!(
            query = %summary.query,
            replacements = summary.total_replacements,
            files = summary.total_files,
            errors = summary.errors.len(),
            committed = commit,
            duration_ms = summary.duration_ms,
            "replace complete"
        );
        Ok(summary)
    }
}

/// Groups matches by file, preserving file order and per-file match order.
fn partition_by_file(results: &[SearchMatch]) -> Vec<(&str, &[SearchMatch])> {
    let mut order: Vec<&str> = Vec::new();
    let mut spans: HashMap<&str, (usize, usize)> = HashMap::new();

    for (i, m) in results.iter().enumerate() {
        match spans.get_mut(m.file.as_str()) {
            Some((_, end)) => *end = i + 1,
            None => {
                order.push(&m.file);
                spans.insert(&m.file, (i, i + 1));
            }
        }
    }

    order
        .into_iter()
        .map(|path| {
            let (start, end) = spans[path];
            (path, &results[start..end])
        })
        .collect()
}
