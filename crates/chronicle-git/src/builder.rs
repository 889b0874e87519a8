// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit record building
//!
//! Turns each [`RawCommitGroup`] into a [`CommitRecord`] by classifying its
//! lines, then attaches the branch reported by `git name-rev` for the commit.
//!
//! Lines are classified by prefix in a fixed order, first match wins:
//!
//! 1. `commit` header
//! 2. `Author:`
//! 3. `Merge:`
//! 4. `Date:`
//! 5. indented description text
//! 6. `--numstat` file line (`added removed path`)
//! 7. anything else that is not empty

use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDateTime};
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, trace};

use crate::commit::{BranchRef, CommitId, CommitRecord, FileChange, LineCount};
use crate::error::GitError;
use crate::tokenizer::{RawCommitGroup, RawLog};
use crate::vcs::VcsQuery;

/// Records produced by the builder, keyed by commit id
pub type RecordMap = HashMap<CommitId, CommitRecord>;

/// git indents message bodies by four columns; three is enough to tell them
/// apart from header and numstat lines
const DESCRIPTION_INDENT: &str = "   ";

/// Date layouts tried in order before falling back to RFC 2822 / RFC 3339
const DATE_FORMATS: &[&str] = &["%a %b %e %H:%M:%S %Y %z", "%Y-%m-%d %H:%M:%S %z"];

// A path starting with a digit is not recognized and ends up in `info`.
static NUMSTAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<added>\d+|-)\s+(?P<removed>\d+|-)\s+(?P<path>\D.*)$")
        .expect("numstat pattern is valid")
});

/// Classification of one raw log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `commit <id>` header
    Header,
    /// Author, prefix stripped and trimmed
    Author(&'a str),
    /// Merge parents, prefix stripped and trimmed
    Merge(&'a str),
    /// Raw date text, prefix stripped and trimmed
    Date(&'a str),
    /// Description text, trimmed
    Description(&'a str),
    /// A numstat line
    File(FileChange),
    /// Any other non-empty line
    Info(&'a str),
    /// Empty line
    Blank,
}

/// Classify a single line of a commit block
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with("commit") {
        LineKind::Header
    } else if let Some(rest) = line.strip_prefix("Author:") {
        LineKind::Author(rest.trim())
    } else if let Some(rest) = line.strip_prefix("Merge:") {
        LineKind::Merge(rest.trim())
    } else if let Some(rest) = line.strip_prefix("Date:") {
        LineKind::Date(rest.trim())
    } else if line.starts_with(DESCRIPTION_INDENT) {
        LineKind::Description(line.trim())
    } else if let Some(change) = parse_numstat(line) {
        LineKind::File(change)
    } else if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Info(line)
    }
}

/// Parse a `--numstat` line such as `3\t1\tsrc/parser.go`
#[must_use]
pub fn parse_numstat(line: &str) -> Option<FileChange> {
    let caps = NUMSTAT_PATTERN.captures(line)?;
    Some(FileChange {
        added: LineCount::parse(&caps["added"])?,
        removed: LineCount::parse(&caps["removed"])?,
        path: caps["path"].trim_end().to_string(),
    })
}

/// Parse a git date and normalize it to UTC
///
/// Returns `None` for anything unrecognized.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.naive_utc())
}

/// Build a record from a commit's raw lines, without branch information
#[must_use]
pub fn build_record(id: &CommitId, group: &RawCommitGroup) -> CommitRecord {
    let mut record = CommitRecord::new(id.clone());

    for line in group.lines() {
        match classify(line) {
            LineKind::Header | LineKind::Blank => {}
            LineKind::Author(author) => record.author = Some(author.to_string()),
            LineKind::Merge(parents) => record.merge_parents = Some(format!(" {parents}")),
            LineKind::Date(raw) => {
                record.timestamp = parse_date(raw);
                if record.timestamp.is_none() {
                    debug!(commit = %id, date = raw, "Unparsable commit date");
                }
            }
            LineKind::Description(text) => record.description.push_str(text),
            LineKind::File(change) => record.files.push(change),
            LineKind::Info(text) => record.info.push(text.to_string()),
        }
    }

    record
}

/// Build one record and resolve its branch through `vcs`
///
/// # Errors
///
/// Returns `GitError` if the name-resolution call fails.
pub fn resolve_record(
    vcs: &dyn VcsQuery,
    id: &CommitId,
    group: &RawCommitGroup,
    remote: &str,
) -> Result<CommitRecord, GitError> {
    let mut record = build_record(id, group);
    let response = vcs.resolve_name(id)?;
    let branch_ref = BranchRef::parse(&response, id, remote);
    if branch_ref.is_none() {
        trace!(commit = %id, response = response.trim(), "No branch for commit");
    }
    record.set_branch(branch_ref);
    Ok(record)
}

/// Build and resolve every commit of a tokenized log
///
/// With `jobs <= 1` commits are resolved one at a time in log order. A larger
/// value resolves them on a rayon pool of that many threads. `on_resolved` is
/// called with `(done, total)` after each commit.
///
/// # Errors
///
/// Returns the first `GitError` from name resolution, or
/// `GitError::WorkerPool` if the pool cannot be started.
pub fn build_records(
    vcs: &dyn VcsQuery,
    log: RawLog,
    remote: &str,
    jobs: usize,
    on_resolved: &(dyn Fn(usize, usize) + Sync),
) -> Result<RecordMap, GitError> {
    let total = log.len();
    let done = AtomicUsize::new(0);
    let resolve = |(id, group): (CommitId, RawCommitGroup)| -> Result<_, GitError> {
        let record = resolve_record(vcs, &id, &group, remote)?;
        on_resolved(done.fetch_add(1, Ordering::Relaxed) + 1, total);
        Ok((id, record))
    };

    if jobs <= 1 {
        return log.into_iter().map(resolve).collect();
    }

    debug!(jobs, total, "Resolving branches in parallel");
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let groups: Vec<_> = log.into_iter().collect();
    let resolved = pool.install(|| {
        groups
            .into_par_iter()
            .map(resolve)
            .collect::<Result<Vec<_>, GitError>>()
    })?;
    Ok(resolved.into_iter().collect())
}
