//! The in-memory file index.
//!
//! Every searchable file is held as an immutable [`FileEntry`] snapshot
//! behind an `Arc`. Mutation always swaps the whole entry, so a reader that
//! cloned the `Arc` keeps a consistent view of the content no matter what the
//! index does afterward. Line arrays are split once at insertion time, not on
//! every search.
//!
//! Content is treated as `\n`-delimited. CRLF content is stored as-is: each
//! line keeps its trailing `\r`, and because search and replace share the
//! same byte arithmetic this stays self-consistent end to end. The engine
//! never normalizes line endings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Extensions that mark a file as binary and therefore unsearchable.
const BINARY_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".exe", ".dll",
];

/// Path segments that mark generated or vendored trees.
const SKIPPED_PATH_SEGMENTS: &[&str] = &[
    "node_modules/",
    ".git/",
    "dist/",
    "build/",
    ".next/",
    "coverage/",
    ".nyc_output/",
    "logs/",
];

/// Files larger than this are never indexed.
const MAX_FILE_SIZE: usize = 1_048_576;

/// Content pushed into the index by the host's virtual file system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub content: String,
    /// Epoch milliseconds. Defaults to the wall clock when absent.
    #[serde(default)]
    pub last_modified: Option<u64>,
}

impl FileSnapshot {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            last_modified: None,
        }
    }
}

/// An immutable snapshot of one indexed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Forward-slash path as supplied by the host. Not normalized.
    pub path: String,
    /// The full file content.
    pub content: String,
    /// Content split on `\n`, precomputed once.
    pub lines: Vec<String>,
    /// Epoch milliseconds.
    pub last_modified: u64,
}

impl FileEntry {
    fn new(path: String, content: String, last_modified: u64) -> Self {
        let lines = content.split('\n').map(str::to_string).collect();
        Self {
            path,
            content,
            lines,
            last_modified,
        }
    }
}

/// Aggregate statistics over the currently stored entries. Skipped and
/// evicted files are invisible here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub file_count: usize,
    pub total_bytes: usize,
    pub total_lines: usize,
}

/// What `update_file` did with the supplied content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The entry was stored (inserted or swapped).
    Stored,
    /// The content now fails the skip rule; any existing entry was evicted.
    Evicted,
}

/// The set of all currently searchable file snapshots, in insertion order.
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: HashMap<String, Arc<FileEntry>>,
    order: Vec<String>,
}

/// Decides whether a file is ineligible for indexing: binary extension,
/// oversized content, or a path inside a generated/vendored tree.
///
/// Pure and total: identical inputs always yield identical output, and no
/// input panics.
pub fn should_skip_file(path: &str, content: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    if BINARY_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        return true;
    }
    if content.len() > MAX_FILE_SIZE {
        return true;
    }
    SKIPPED_PATH_SEGMENTS
        .iter()
        .any(|segment| path.contains(segment))
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire index with the supplied snapshots, preserving
    /// their iteration order as index order. Returns `(stored, skipped)`
    /// counts.
    pub fn index_files<I>(&mut self, files: I) -> (usize, usize)
    where
        I: IntoIterator<Item = (String, FileSnapshot)>,
    {
        self.entries.clear();
        self.order.clear();

        let mut skipped = 0;
        for (path, snapshot) in files {
            if should_skip_file(&path, &snapshot.content) {
                debug!(%path, "skipping file at index time");
                skipped += 1;
                continue;
            }
            let last_modified = snapshot.last_modified.unwrap_or_else(now_millis);
            self.store(FileEntry::new(path, snapshot.content, last_modified));
        }

        debug!(
            stored = self.entries.len(),
            skipped, "index replaced"
        );
        (self.entries.len(), skipped)
    }

    /// Swaps in new content for one file, reapplying the skip rule. Content
    /// that now fails it evicts the entry instead of storing it: a deliberate
    /// demotion, not an error.
    pub fn update_file(&mut self, path: &str, content: impl Into<String>) -> UpdateOutcome {
        let content = content.into();
        if should_skip_file(path, &content) {
            debug!(path, "updated content fails skip rule, evicting");
            self.remove_file(path);
            return UpdateOutcome::Evicted;
        }
        self.store(FileEntry::new(path.to_string(), content, now_millis()));
        UpdateOutcome::Stored
    }

    /// Unconditional delete.
    pub fn remove_file(&mut self, path: &str) {
        if self.entries.remove(path).is_some() {
            self.order.retain(|p| p != path);
            trace!(path, "removed from index");
        }
    }

    /// The current snapshot for a path, if indexed.
    pub fn entry(&self, path: &str) -> Option<Arc<FileEntry>> {
        self.entries.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// All entries in index insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<FileEntry>> {
        self.order.iter().filter_map(|path| self.entries.get(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            file_count: self.entries.len(),
            ..Default::default()
        };
        for entry in self.entries() {
            stats.total_bytes += entry.content.len();
            stats.total_lines += entry.lines.len();
        }
        stats
    }

    fn store(&mut self, entry: FileEntry) {
        let path = entry.path.clone();
        if self.entries.insert(path.clone(), Arc::new(entry)).is_none() {
            self.order.push(path);
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
