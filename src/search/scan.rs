//! Per-file line scanning and match assembly.

use crate::index::FileEntry;
use crate::results::{LineContext, SearchMatch};

use super::matcher::QueryMatcher;

/// Lines at most this many characters long are previewed whole.
const PREVIEW_MAX_LINE: usize = 100;
/// Window radius, in characters, around a match on a long line.
const PREVIEW_RADIUS: usize = 50;

/// Scans one entry top to bottom, appending up to `remaining` matches in
/// (line ascending, column ascending) order. Returns true if a further match
/// was found beyond that cap, the caller's has-more signal.
pub(crate) fn scan_entry(
    entry: &FileEntry,
    matcher: &QueryMatcher,
    remaining: Option<usize>,
    out: &mut Vec<SearchMatch>,
) -> bool {
    let mut taken = 0;
    for (line_index, line) in entry.lines.iter().enumerate() {
        for (start, end) in matcher.find_in_line(line) {
            if remaining.is_some_and(|limit| taken >= limit) {
                return true;
            }
            out.push(build_match(entry, line_index, line, start, end));
            taken += 1;
        }
    }
    false
}

fn build_match(
    entry: &FileEntry,
    line_index: usize,
    line: &str,
    start: usize,
    end: usize,
) -> SearchMatch {
    let context = LineContext {
        before: if line_index > 0 {
            entry.lines[line_index - 1].clone()
        } else {
            String::new()
        },
        after: entry
            .lines
            .get(line_index + 1)
            .cloned()
            .unwrap_or_default(),
    };

    SearchMatch {
        file: entry.path.clone(),
        line: line_index + 1,
        column: start + 1,
        text: line.to_string(),
        matched: line[start..end].to_string(),
        context,
        preview: build_preview(line, start, end),
    }
}

/// The full line when short enough, otherwise a character window around the
/// match with `...` on each side that does not reach the line boundary.
pub(crate) fn build_preview(line: &str, start: usize, end: usize) -> String {
    let total_chars = line.chars().count();
    if total_chars <= PREVIEW_MAX_LINE {
        return line.to_string();
    }

    let start_char = line[..start].chars().count();
    let end_char = start_char + line[start..end].chars().count();

    let window_start = start_char.saturating_sub(PREVIEW_RADIUS);
    let window_end = (end_char + PREVIEW_RADIUS).min(total_chars);

    let from = byte_of_char(line, window_start);
    let to = byte_of_char(line, window_end);

    let mut preview = String::with_capacity(to - from + 6);
    if window_start > 0 {
        preview.push_str("...");
    }
    preview.push_str(&line[from..to]);
    if window_end < total_chars {
        preview.push_str("...");
    }
    preview
}

/// Byte offset of the `n`th character; `line.len()` when `n` is past the end.
fn byte_of_char(line: &str, n: usize) -> usize {
    line.char_indices().nth(n).map_or(line.len(), |(i, _)| i)
}
