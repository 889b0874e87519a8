#![no_main]

//! Fuzz target for changelog rendering
//!
//! Arbitrary entries must render without panicking, and the JSON document
//! must parse back.

use arbitrary::Arbitrary;
use chrono::{DateTime, Utc};
use libfuzzer_sys::fuzz_target;

use chronicle::render::{render_json, render_markdown};
use chronicle_git::{BranchChangelog, ChangelogEntry, CommitId, FileChange, LineCount};

#[derive(Debug, Arbitrary)]
struct FuzzEntry {
    branch: String,
    offset: u32,
    id: String,
    seconds: i64,
    author: Option<String>,
    log: String,
    files: Vec<(Option<u64>, Option<u64>, String)>,
}

fn line_count(count: Option<u64>) -> LineCount {
    count.map_or(LineCount::Binary, LineCount::Lines)
}

fuzz_target!(|entries: Vec<FuzzEntry>| {
    let mut changelog = BranchChangelog::default();
    for entry in entries {
        let Some(commit) = CommitId::new(&entry.id) else {
            continue;
        };
        let date = DateTime::from_timestamp(entry.seconds, 0).map(|d| d.naive_utc());
        let files = entry
            .files
            .into_iter()
            .map(|(added, removed, path)| FileChange {
                added: line_count(added),
                removed: line_count(removed),
                path,
            })
            .collect();
        changelog.insert(
            &entry.branch,
            entry.offset,
            ChangelogEntry {
                commit,
                date,
                author: entry.author,
                log: entry.log,
                files,
            },
        );
    }

    let generated = DateTime::from_timestamp(0, 0)
        .map(|d| d.naive_utc())
        .unwrap_or_default();

    let markdown = render_markdown(&changelog, generated, &Utc);
    assert!(markdown.starts_with("# Changelog "));

    let json = render_json(&changelog, generated).expect("render json");
    let _: serde_json::Value = serde_json::from_str(&json).expect("json parses back");
});
