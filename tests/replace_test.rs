use anyhow::Result;
use bufscout::{FileSnapshot, ReplaceOptions, SearchEngine, SearchOptions};

fn snapshots(pairs: &[(&str, &str)]) -> Vec<(String, FileSnapshot)> {
    pairs
        .iter()
        .map(|(path, content)| (path.to_string(), FileSnapshot::new(*content)))
        .collect()
}

fn engine_with(pairs: &[(&str, &str)]) -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.index_files(snapshots(pairs));
    engine
}

fn whole_word(query: &str) -> SearchOptions {
    SearchOptions {
        query: query.to_string(),
        whole_word: true,
        ..Default::default()
    }
}

#[test]
fn test_replace_across_lines() -> Result<()> {
    let mut engine = engine_with(&[("a.ts", "const x = 1;\nconst y = 2;")]);

    let summary = engine.replace(&ReplaceOptions::new(whole_word("const"), "let"))?;

    assert_eq!(summary.total_replacements, 2);
    assert_eq!(summary.total_files, 1);
    assert!(summary.errors.is_empty());
    assert_eq!(engine.file("a.ts").unwrap().content, "let x = 1;\nlet y = 2;");
    Ok(())
}

#[test]
fn test_equal_length_replacement_round_trip() -> Result<()> {
    let original = "alpha\nbeta target gamma\ndelta";
    let mut engine = engine_with(&[("a.txt", original)]);

    let summary = engine.replace(&ReplaceOptions::new(
        SearchOptions::literal("target"),
        "TARGET",
    ))?;
    assert_eq!(summary.total_replacements, 1);

    let entry = engine.file("a.txt").unwrap();
    assert_eq!(entry.lines[1], "beta TARGET gamma");
    // All other lines byte-identical.
    assert_eq!(entry.lines[0], "alpha");
    assert_eq!(entry.lines[2], "delta");
    assert_eq!(summary.results[0].line, 2);
    assert_eq!(summary.results[0].column, 6);
    Ok(())
}

#[test]
fn test_descending_order_prevents_offset_corruption() -> Result<()> {
    // Three matches on one line, replacement longer than the match: an
    // ascending application would splice at stale offsets.
    let mut engine = engine_with(&[("a.txt", "aaa")]);

    let options = ReplaceOptions::new(
        SearchOptions {
            case_sensitive: true,
            ..SearchOptions::literal("a")
        },
        "bb",
    );
    let summary = engine.replace(&options)?;

    assert_eq!(summary.total_replacements, 3);
    assert_eq!(engine.file("a.txt").unwrap().content, "bbbbbb");
    Ok(())
}

#[test]
fn test_capture_group_expansion() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "user@host and admin@box")]);

    let options = ReplaceOptions::new(
        SearchOptions {
            query: r"(\w+)@(\w+)".to_string(),
            use_regex: true,
            case_sensitive: true,
            ..Default::default()
        },
        "$2.$1",
    );
    let summary = engine.replace(&options)?;

    assert_eq!(summary.total_replacements, 2);
    assert_eq!(
        engine.file("a.txt").unwrap().content,
        "host.user and box.admin"
    );
    Ok(())
}

#[test]
fn test_replace_respects_file_filters() -> Result<()> {
    let mut engine = engine_with(&[("keep.ts", "old"), ("skip.rs", "old")]);

    let options = ReplaceOptions::new(
        SearchOptions {
            include_patterns: vec!["*.ts".to_string()],
            ..SearchOptions::literal("old")
        },
        "new",
    );
    let summary = engine.replace(&options)?;

    assert_eq!(summary.total_replacements, 1);
    assert_eq!(engine.file("keep.ts").unwrap().content, "new");
    assert_eq!(engine.file("skip.rs").unwrap().content, "old");
    Ok(())
}

#[test]
fn test_replace_max_results_limits_applied_matches() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "x x x x")]);

    let options = ReplaceOptions::new(
        SearchOptions {
            max_results: Some(2),
            ..SearchOptions::literal("x")
        },
        "y",
    );
    let summary = engine.replace(&options)?;

    assert_eq!(summary.total_replacements, 2);
    assert_eq!(engine.file("a.txt").unwrap().content, "y y x x");
    Ok(())
}

#[test]
fn test_preview_leaves_index_untouched() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "old old")]);
    let before = engine.file("a.txt").unwrap();

    let summary = engine.preview_replace(&ReplaceOptions::new(SearchOptions::literal("old"), "new"))?;

    assert_eq!(summary.total_replacements, 2);
    assert_eq!(summary.results[0].new_text, "new");
    assert_eq!(engine.file("a.txt").unwrap().content, "old old");
    // The previously held snapshot is the same object, untouched.
    assert_eq!(before.content, "old old");
    Ok(())
}

#[test]
fn test_snapshot_held_across_replace_stays_consistent() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "before")]);
    let held = engine.file("a.txt").unwrap();

    engine.replace(&ReplaceOptions::new(SearchOptions::literal("before"), "after"))?;

    assert_eq!(held.content, "before");
    assert_eq!(engine.file("a.txt").unwrap().content, "after");
    Ok(())
}

#[test]
fn test_replacement_growing_past_size_cap_evicts() -> Result<()> {
    // Just under the 1 MiB cap; one growing replacement pushes it past.
    let content = format!("seed\n{}", "x".repeat(1_048_000));
    let mut engine = engine_with(&[("grow.txt", content.as_str())]);
    assert_eq!(engine.stats().file_count, 1);

    // The commit reapplies the skip rule and demotes the oversized file.
    let summary = engine.replace(&ReplaceOptions::new(
        SearchOptions::literal("seed"),
        "s".repeat(1000),
    ))?;

    assert_eq!(summary.total_replacements, 1);
    assert!(engine.file("grow.txt").is_none());
    assert_eq!(engine.stats().file_count, 0);
    Ok(())
}

#[test]
fn test_zero_matches_is_clean_noop() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "nothing here")]);

    let summary = engine.replace(&ReplaceOptions::new(SearchOptions::literal("absent"), "x"))?;

    assert_eq!(summary.total_replacements, 0);
    assert_eq!(summary.total_files, 0);
    assert!(summary.results.is_empty());
    assert!(summary.errors.is_empty());
    assert_eq!(engine.file("a.txt").unwrap().content, "nothing here");
    Ok(())
}

#[test]
fn test_replace_recorded_in_both_histories() -> Result<()> {
    let mut engine = engine_with(&[("a.txt", "needle")]);

    let mut options = ReplaceOptions::new(SearchOptions::literal("needle"), "thread");
    options.confirm_each = true;
    engine.replace(&options)?;

    assert_eq!(engine.history().recent_searches().count(), 1);
    let recorded: Vec<_> = engine.history().recent_replaces().collect();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].replacement, "thread");
    assert!(recorded[0].confirm_each);

    // Both histories feed suggestions.
    assert_eq!(engine.suggestions("need"), ["needle"]);
    Ok(())
}

#[test]
fn test_multi_file_replace_counts_files() -> Result<()> {
    let mut engine = engine_with(&[
        ("a.txt", "old old"),
        ("b.txt", "nothing"),
        ("c.txt", "old"),
    ]);

    let summary = engine.replace(&ReplaceOptions::new(SearchOptions::literal("old"), "new"))?;

    assert_eq!(summary.total_replacements, 3);
    assert_eq!(summary.total_files, 2);
    assert_eq!(engine.file("a.txt").unwrap().content, "new new");
    assert_eq!(engine.file("b.txt").unwrap().content, "nothing");
    assert_eq!(engine.file("c.txt").unwrap().content, "new");
    Ok(())
}

#[test]
fn test_multibyte_content_replaces_cleanly() -> Result<()> {
    let mut engine = engine_with(&[("unicode.txt", "héllo wörld héllo")]);

    let summary = engine.replace(&ReplaceOptions::new(SearchOptions::literal("héllo"), "salut"))?;

    assert_eq!(summary.total_replacements, 2);
    assert_eq!(engine.file("unicode.txt").unwrap().content, "salut wörld salut");
    Ok(())
}
