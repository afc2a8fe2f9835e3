//! Include/exclude file filtering with simplified glob patterns.
//!
//! The glob dialect is deliberately small: `*` matches zero or more
//! characters (crossing path separators; there is no `**` distinction), `?`
//! matches exactly one character, everything else is literal, and matching is
//! case-insensitive against the whole path. Patterns are translated to
//! anchored regexes; because every non-wildcard character is escaped, the
//! translation cannot produce an invalid regex.

use std::sync::Arc;

use regex::Regex;

use crate::config::SearchOptions;
use crate::index::{FileEntry, FileIndex};

/// Whether `path` matches the simplified glob `pattern`.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    compile_glob(pattern).is_match(path)
}

/// Selects the index entries a search is allowed to touch, preserving index
/// insertion order. A file is eligible iff it matches at least one include
/// pattern (or none are given) and matches no exclude pattern; exclude wins
/// when both match.
pub fn files_to_search(index: &FileIndex, options: &SearchOptions) -> Vec<Arc<FileEntry>> {
    let includes: Vec<Regex> = options.include_patterns.iter().map(|p| compile_glob(p)).collect();
    let excludes: Vec<Regex> = options.exclude_patterns.iter().map(|p| compile_glob(p)).collect();

    index
        .entries()
        .filter(|entry| {
            (includes.is_empty() || includes.iter().any(|re| re.is_match(&entry.path)))
                && !excludes.iter().any(|re| re.is_match(&entry.path))
        })
        .cloned()
        .collect()
}

fn compile_glob(pattern: &str) -> Regex {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push_str("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            c => translated.push_str(&regex::escape(&c.to_string())),
        }
    }
    translated.push('$');
    Regex::new(&translated).expect("escaped glob translation is always a valid regex")
}
