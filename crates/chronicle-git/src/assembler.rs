// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Branch changelog assembly
//!
//! Walks the first-parent log of the tracked remote branch and files every
//! commit it names under the branch and offset resolved for it in the
//! full-history records. Commits missing from either side are left out.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::builder::RecordMap;
use crate::commit::{CommitId, CommitRecord, DATE_FORMAT, FileChange};

/// One commit as it appears in the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    /// Commit identifier
    pub commit: CommitId,
    /// Commit date (UTC)
    pub date: Option<NaiveDateTime>,
    /// Author line
    pub author: Option<String>,
    /// Commit description
    pub log: String,
    /// Files touched, in log order
    pub files: Vec<FileChange>,
}

impl ChangelogEntry {
    /// The date as `YYYY-MM-DD HH:MM:SS`, or an empty string
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl From<&CommitRecord> for ChangelogEntry {
    fn from(record: &CommitRecord) -> Self {
        Self {
            commit: record.id.clone(),
            date: record.timestamp,
            author: record.author.clone(),
            log: record.description.clone(),
            files: record.files.clone(),
        }
    }
}

/// Entries of one branch keyed by offset below the tip, ascending
pub type BranchEntries = BTreeMap<u32, ChangelogEntry>;

/// Per-branch changelog, branches and offsets in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BranchChangelog {
    branches: BTreeMap<String, BranchEntries>,
}

impl BranchChangelog {
    /// Number of branches with at least one entry
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Check if no commit made it into the changelog
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Total number of entries across all branches
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.branches.values().map(BTreeMap::len).sum()
    }

    /// Entries for one branch
    #[must_use]
    pub fn branch(&self, name: &str) -> Option<&BranchEntries> {
        self.branches.get(name)
    }

    /// Entry at `offset` on `branch`
    #[must_use]
    pub fn get(&self, branch: &str, offset: u32) -> Option<&ChangelogEntry> {
        self.branches.get(branch).and_then(|entries| entries.get(&offset))
    }

    /// Iterate branches in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BranchEntries)> {
        self.branches.iter().map(|(name, entries)| (name.as_str(), entries))
    }

    /// File an entry, returning the one it replaced
    pub fn insert(
        &mut self,
        branch: &str,
        offset: u32,
        entry: ChangelogEntry,
    ) -> Option<ChangelogEntry> {
        self.branches
            .entry(branch.to_string())
            .or_default()
            .insert(offset, entry)
    }
}

/// Assemble the changelog from the first-parent log of the tracked branch
///
/// Only `commit <id>` lines of `branch_log` are read. Ids without a record,
/// and records without a branch, are skipped. When two commits share a
/// `(branch, offset)` slot the later one in `branch_log` wins.
#[must_use]
pub fn assemble(records: &RecordMap, branch_log: &str) -> BranchChangelog {
    let mut changelog = BranchChangelog::default();
    let mut missing = 0usize;

    for line in branch_log.lines() {
        let Some(id) = CommitId::from_header(line) else {
            continue;
        };
        let Some(record) = records.get(&id) else {
            trace!(commit = %id, "Commit not in full history window");
            missing += 1;
            continue;
        };
        let Some(branch) = record.branch.as_deref().filter(|b| !b.is_empty()) else {
            trace!(commit = %id, "Commit has no branch");
            continue;
        };

        let entry = ChangelogEntry::from(record);
        if let Some(replaced) = changelog.insert(branch, record.branch_offset, entry) {
            warn!(
                branch,
                offset = record.branch_offset,
                kept = %id,
                dropped = %replaced.commit,
                "Two commits share a changelog slot, keeping the later one"
            );
        }
    }

    debug!(
        branches = changelog.len(),
        entries = changelog.entry_count(),
        missing,
        "Assembled changelog"
    );
    changelog
}
