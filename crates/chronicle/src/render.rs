// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Changelog documents
//!
//! Renders a [`BranchChangelog`] as Markdown or JSON. Branches come out in
//! name order and entries by ascending offset, so the newest commit of each
//! branch is listed first.
//!
//! Commit dates are stored in UTC. Markdown shows them in the time zone
//! passed in (the local zone for the CLI); JSON keeps UTC.

use std::fmt::Display;

use chrono::{NaiveDateTime, TimeZone, Utc};
use chronicle_git::commit::DATE_FORMAT;
use chronicle_git::{BranchChangelog, ChangelogEntry};
use serde::Serialize;

use crate::config::OutputFormat;

/// Format of the generation time in the document header
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render `changelog` in the chosen format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<Tz>(
    format: OutputFormat,
    changelog: &BranchChangelog,
    generated: NaiveDateTime,
    zone: &Tz,
) -> Result<String, serde_json::Error>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match format {
        OutputFormat::Markdown => Ok(render_markdown(changelog, generated, zone)),
        OutputFormat::Json => render_json(changelog, generated),
    }
}

/// Render the Markdown changelog
///
/// Each entry is headed `+ <n> :: <date>` where `n` is the 1-based position
/// below the branch tip and the date is shown in `zone`.
#[must_use]
pub fn render_markdown<Tz>(
    changelog: &BranchChangelog,
    generated: NaiveDateTime,
    zone: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = format!("# Changelog {}\n", generated.format(GENERATED_FORMAT));

    for (branch, entries) in changelog.iter() {
        out.push_str(&format!("## {branch}\n"));
        for (offset, entry) in entries {
            render_entry(&mut out, *offset, entry, zone);
        }
    }
    out
}

/// The entry date in `zone`, or an empty string
fn zoned_date<Tz>(entry: &ChangelogEntry, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entry
        .date
        .map(|utc| {
            Utc.from_utc_datetime(&utc)
                .with_timezone(zone)
                .format(DATE_FORMAT)
                .to_string()
        })
        .unwrap_or_default()
}

fn render_entry<Tz>(out: &mut String, offset: u32, entry: &ChangelogEntry, zone: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    out.push_str(&format!(
        "+ {} :: {}\n",
        u64::from(offset) + 1,
        zoned_date(entry, zone)
    ));
    out.push_str(&format!("\t* commit {}\n", entry.commit));
    out.push_str(&format!("\t* {}\n", entry.author.as_deref().unwrap_or_default()));
    out.push_str(&format!("\t* {}\n", entry.log));
    out.push_str("\t\t```\n");
    for file in &entry.files {
        out.push_str(&format!("\t\t{}\n", file.path));
    }
    out.push_str("\t\t```\n\n");
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated: String,
    branches: &'a BranchChangelog,
}

/// Render the changelog as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(
    changelog: &BranchChangelog,
    generated: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    let document = JsonDocument {
        generated: generated.format(GENERATED_FORMAT).to_string(),
        branches: changelog,
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use chronicle_git::{CommitId, FileChange, LineCount};
    use proptest::prelude::*;
    use similar_asserts::assert_eq;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    fn entry(id: &str, log: &str, files: &[&str]) -> ChangelogEntry {
        ChangelogEntry {
            commit: CommitId::new(id).expect("id"),
            date: Some(at(2024, 1, 1, 10, 0, 0)),
            author: Some("Jane Doe <jane@example.com>".to_string()),
            log: log.to_string(),
            files: files
                .iter()
                .map(|path| FileChange {
                    added: LineCount::Lines(1),
                    removed: LineCount::Lines(0),
                    path: (*path).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_markdown_single_entry() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 2, entry("abc123", "Fix bug in parser", &["src/parser.go"]));

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &Utc);
        let expected = "# Changelog 2024-01-02 03:04\n\
                        ## main\n\
                        + 3 :: 2024-01-01 10:00:00\n\
                        \t* commit abc123\n\
                        \t* Jane Doe <jane@example.com>\n\
                        \t* Fix bug in parser\n\
                        \t\t```\n\
                        \t\tsrc/parser.go\n\
                        \t\t```\n\
                        \n";
        assert_eq!(doc.as_str(), expected);
    }

    #[test]
    fn test_render_markdown_shows_dates_in_zone() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 0, entry("abc123", "Fix bug", &[]));
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("offset");
        let minus_five = FixedOffset::west_opt(5 * 3600).expect("offset");

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &plus_two);
        assert!(doc.contains("+ 1 :: 2024-01-01 12:00:00\n"));

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &minus_five);
        assert!(doc.contains("+ 1 :: 2024-01-01 05:00:00\n"));
    }

    #[test]
    fn test_render_json_keeps_utc_dates() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 0, entry("abc123", "Fix bug", &[]));

        let json = render_json(&changelog, at(2024, 1, 2, 3, 4, 5)).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(
            value["branches"]["main"]["0"]["date"],
            serde_json::json!("2024-01-01T10:00:00")
        );
    }

    #[test]
    fn test_render_markdown_empty_changelog() {
        let doc = render_markdown(
            &BranchChangelog::default(),
            at(2024, 1, 2, 3, 4, 5),
            &Utc,
        );
        assert_eq!(doc.as_str(), "# Changelog 2024-01-02 03:04\n");
    }

    #[test]
    fn test_render_markdown_numeric_offset_order() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 10, entry("c3", "eleventh", &[]));
        changelog.insert("main", 2, entry("b2", "third", &[]));
        changelog.insert("main", 0, entry("a1", "first", &[]));

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &Utc);
        let headings: Vec<&str> = doc.lines().filter(|l| l.starts_with("+ ")).collect();
        assert_eq!(
            headings,
            vec![
                "+ 1 :: 2024-01-01 10:00:00",
                "+ 3 :: 2024-01-01 10:00:00",
                "+ 11 :: 2024-01-01 10:00:00",
            ]
        );
    }

    #[test]
    fn test_render_markdown_branches_in_name_order() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 0, entry("a1", "on main", &[]));
        changelog.insert("feature/login", 0, entry("b2", "on feature", &[]));

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &Utc);
        let branches: Vec<&str> = doc.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(branches, vec!["## feature/login", "## main"]);
    }

    #[test]
    fn test_render_markdown_missing_author_and_date() {
        let mut changelog = BranchChangelog::default();
        let mut bare = entry("a1", "no metadata", &["a.txt", "b.txt"]);
        bare.author = None;
        bare.date = None;
        changelog.insert("main", 0, bare);

        let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &Utc);
        assert!(doc.contains("+ 1 :: \n"));
        assert!(doc.contains("\t* \n"));
        assert!(doc.contains("\t\ta.txt\n\t\tb.txt\n"));
    }

    #[test]
    fn test_render_json_document() {
        let mut changelog = BranchChangelog::default();
        changelog.insert("main", 2, entry("abc123", "Fix bug", &["src/parser.go"]));

        let json = render_json(&changelog, at(2024, 1, 2, 3, 4, 5)).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

        assert_eq!(value["generated"], serde_json::json!("2024-01-02 03:04"));
        let entry = &value["branches"]["main"]["2"];
        assert_eq!(entry["commit"], serde_json::json!("abc123"));
        assert_eq!(entry["log"], serde_json::json!("Fix bug"));
        assert_eq!(entry["files"][0]["path"], serde_json::json!("src/parser.go"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let changelog = BranchChangelog::default();
        let generated = at(2024, 1, 2, 3, 4, 5);
        let markdown = render(OutputFormat::Markdown, &changelog, generated, &Utc).expect("md");
        assert!(markdown.starts_with("# Changelog"));
        let json = render(OutputFormat::Json, &changelog, generated, &Utc).expect("json");
        assert!(json.trim_start().starts_with('{'));
    }

    proptest! {
        /// Property: one `+ n ::` heading per entry, numbered from 1 in ascending order
        #[test]
        fn prop_markdown_headings_follow_offsets(
            offsets in proptest::collection::btree_set(0u32..500, 0..30),
        ) {
            let mut changelog = BranchChangelog::default();
            for offset in &offsets {
                changelog.insert("main", *offset, entry(&format!("c{offset}"), "change", &[]));
            }

            let doc = render_markdown(&changelog, at(2024, 1, 2, 3, 4, 5), &Utc);
            let numbers: Vec<u64> = doc
                .lines()
                .filter_map(|l| l.strip_prefix("+ "))
                .filter_map(|l| l.split(" :: ").next())
                .filter_map(|n| n.parse().ok())
                .collect();
            let expected: Vec<u64> = offsets.iter().map(|o| u64::from(*o) + 1).collect();
            prop_assert_eq!(numbers, expected);
        }
    }
}
