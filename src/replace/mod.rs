//! Applying located matches back onto file content.
//!
//! Matches within a file are applied in descending `(line, column)` order:
//! replacing the last match first leaves the byte offsets of all earlier,
//! not-yet-applied matches unchanged, because nothing before them in the file
//! has shifted. Offsets are always resolved from the original snapshot's line
//! array, never incrementally tracked, which is what makes the descending
//! strategy correct without bookkeeping of cumulative shifts.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::config::ReplaceOptions;
use crate::errors::EngineError;
use crate::index::FileEntry;
use crate::results::{ReplaceResult, SearchMatch};

/// The outcome of applying one file's matches.
#[derive(Debug)]
pub(crate) struct AppliedFile {
    /// One outcome per match, ascending (line, column).
    pub results: Vec<ReplaceResult>,
    /// The rewritten content, present only when at least one match applied.
    pub new_content: Option<String>,
}

/// Applies every match located in `entry` per the replace options.
///
/// Failures are per-match: an unresolvable or stale match records a failed
/// [`ReplaceResult`] and the remaining matches are still attempted.
pub(crate) fn apply_to_entry(
    entry: &FileEntry,
    matches: &[SearchMatch],
    options: &ReplaceOptions,
) -> AppliedFile {
    // Compiles only when the search half already compiled, so failure here
    // is unreachable in practice; a None template falls back to verbatim
    // replacement.
    let template_regex = if options.search.use_regex {
        build_template_regex(options)
    } else {
        None
    };

    let mut ordered: Vec<&SearchMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| std::cmp::Reverse((m.line, m.column)));

    let mut content = entry.content.clone();
    let mut results = Vec::with_capacity(ordered.len());
    let mut successes = 0usize;

    for m in ordered {
        let new_text = expand_replacement(template_regex.as_ref(), &m.matched, &options.replacement);
        match splice(&mut content, entry, m, &new_text) {
            Ok(()) => {
                successes += 1;
                results.push(ReplaceResult {
                    file: m.file.clone(),
                    line: m.line,
                    column: m.column,
                    original_text: m.matched.clone(),
                    new_text,
                    success: true,
                    error: None,
                });
            }
            Err(reason) => {
                let err =
                    EngineError::replacement_failed(m.file.as_str(), m.line, m.column, reason);
                warn!(%err, "replacement skipped");
                results.push(ReplaceResult {
                    file: m.file.clone(),
                    line: m.line,
                    column: m.column,
                    original_text: m.matched.clone(),
                    new_text: String::new(),
                    success: false,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    // Report ascending like search results; application order was descending.
    results.reverse();

    debug!(
        path = %entry.path,
        attempted = results.len(),
        applied = successes,
        "file replacements applied"
    );

    AppliedFile {
        results,
        new_content: (successes > 0).then_some(content),
    }
}

/// Absolute byte offset of a 1-based `(line, column)` position, resolved
/// against the original snapshot's line array: the lengths of all preceding
/// lines, each plus one newline, plus the column.
pub(crate) fn resolve_offset(lines: &[String], line: usize, column: usize) -> Result<usize, String> {
    if line == 0 || column == 0 {
        return Err(format!("position {line}:{column} is not 1-based"));
    }
    if line > lines.len() {
        return Err(format!("line {line} beyond {}-line content", lines.len()));
    }
    let line_start: usize = lines[..line - 1].iter().map(|l| l.len() + 1).sum();
    if column - 1 > lines[line - 1].len() {
        return Err(format!(
            "column {column} beyond {}-byte line {line}",
            lines[line - 1].len()
        ));
    }
    Ok(line_start + column - 1)
}

fn splice(
    content: &mut String,
    entry: &FileEntry,
    m: &SearchMatch,
    new_text: &str,
) -> Result<(), String> {
    let start = resolve_offset(&entry.lines, m.line, m.column)?;
    let end = start + m.matched.len();

    if end > content.len() {
        return Err(format!(
            "offset range {start}..{end} out of bounds for {}-byte content",
            content.len()
        ));
    }
    if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
        return Err(format!("offset range {start}..{end} splits a character"));
    }
    if &content[start..end] != m.matched {
        return Err("matched text no longer present at resolved offset".to_string());
    }

    content.replace_range(start..end, new_text);
    Ok(())
}

/// In regex mode the replacement is a template: `$1`/`$name` refer to capture
/// groups of the query re-run against the matched text. Literal mode, or a
/// template regex that unexpectedly fails to re-match, inserts the
/// replacement verbatim.
fn expand_replacement(regex: Option<&Regex>, matched: &str, replacement: &str) -> String {
    match regex.and_then(|re| re.captures(matched)) {
        Some(captures) => {
            let mut out = String::with_capacity(replacement.len());
            captures.expand(replacement, &mut out);
            out
        }
        None => replacement.to_string(),
    }
}

fn build_template_regex(options: &ReplaceOptions) -> Option<Regex> {
    RegexBuilder::new(&options.search.query)
        .case_insensitive(!options.search.case_sensitive)
        .build()
        .ok()
}
