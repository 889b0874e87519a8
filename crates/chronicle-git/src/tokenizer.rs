// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Raw `git log` tokenizing
//!
//! Splits the text of `git log --numstat` into one group of lines per commit.
//! A group starts at a line beginning with `commit <id>` and runs until the
//! next such line.
//!
//! # Example
//!
//! ```
//! use chronicle_git::tokenizer::tokenize;
//!
//! let log = "commit abc123\nAuthor: Jane <jane@example.com>\n\n    Fix\n";
//! let groups = tokenize(log);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups.get("abc123").map(|g| g.lines().len()), Some(4));
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::commit::CommitId;

/// The raw lines of one commit block, header line included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCommitGroup {
    lines: Vec<String>,
}

impl RawCommitGroup {
    /// Build a group from already split lines
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines in log order
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Commit groups keyed by id, iterable in first-seen order
#[derive(Debug, Clone, Default)]
pub struct RawLog {
    index: HashMap<CommitId, usize>,
    groups: Vec<(CommitId, RawCommitGroup)>,
}

impl RawLog {
    /// Number of distinct commits
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no commit was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up the group for a commit id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RawCommitGroup> {
        self.index.get(id).map(|&i| &self.groups[i].1)
    }

    /// Iterate groups in the order their ids first appeared
    pub fn iter(&self) -> impl Iterator<Item = (&CommitId, &RawCommitGroup)> {
        self.groups.iter().map(|(id, group)| (id, group))
    }

    fn open(&mut self, id: CommitId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.groups.len();
        self.index.insert(id.clone(), i);
        self.groups.push((id, RawCommitGroup::default()));
        i
    }
}

impl IntoIterator for RawLog {
    type Item = (CommitId, RawCommitGroup);
    type IntoIter = std::vec::IntoIter<(CommitId, RawCommitGroup)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Split raw log text into per-commit groups
///
/// Lines before the first `commit` header are dropped. A header whose id is
/// empty does not start a group; it and the lines after it stay with the
/// group that is already open. A repeated id appends to its earlier group.
#[must_use]
pub fn tokenize(text: &str) -> RawLog {
    let mut log = RawLog::default();
    let mut current: Option<usize> = None;
    let mut dropped = 0usize;

    for line in text.lines() {
        if line.starts_with("commit") {
            if let Some(id) = CommitId::from_header(line) {
                current = Some(log.open(id));
            }
        }

        match current {
            Some(i) => log.groups[i].1.push(line),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        trace!(dropped, "Dropped lines before the first commit header");
    }

    log
}
