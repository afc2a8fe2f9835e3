//! Engine activity counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks index and batch activity across the lifetime of one engine.
///
/// Counters are atomic so a host may hold a clone on another thread for
/// display while the owning thread drives the engine.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    files_indexed: Arc<AtomicU64>,
    files_skipped: Arc<AtomicU64>,
    bytes_indexed: Arc<AtomicU64>,
    searches_run: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,
    replacements_applied: Arc<AtomicU64>,
    replacements_failed: Arc<AtomicU64>,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_indexed(&self, files: u64, skipped: u64, bytes: u64) {
        self.files_indexed.fetch_add(files, Ordering::Relaxed);
        self.files_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.bytes_indexed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_search(&self, matches: u64) {
        self.searches_run.fetch_add(1, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
    }

    pub fn record_replacements(&self, applied: u64, failed: u64) {
        self.replacements_applied.fetch_add(applied, Ordering::Relaxed);
        self.replacements_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// A point-in-time snapshot of all counters.
    pub fn get_stats(&self) -> EngineStats {
        EngineStats {
            files_indexed: self.files_indexed.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            bytes_indexed: self.bytes_indexed.load(Ordering::Relaxed),
            searches_run: self.searches_run.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            replacements_applied: self.replacements_applied.load(Ordering::Relaxed),
            replacements_failed: self.replacements_failed.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters at info level.
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            files_indexed = stats.files_indexed,
            files_skipped = stats.files_skipped,
            bytes_indexed = stats.bytes_indexed,
            searches_run = stats.searches_run,
            matches_found = stats.matches_found,
            replacements_applied = stats.replacements_applied,
            replacements_failed = stats.replacements_failed,
            "engine activity"
        );
    }
}

/// Snapshot of [`EngineMetrics`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub files_indexed: u64,
    pub files_skipped: u64,
    pub bytes_indexed: u64,
    pub searches_run: u64,
    pub matches_found: u64,
    pub replacements_applied: u64,
    pub replacements_failed: u64,
}
