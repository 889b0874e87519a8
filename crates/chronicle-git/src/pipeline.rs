// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Changelog pipeline
//!
//! Runs the three stages in order: tokenize the full history, build and
//! resolve every commit, then assemble against the tracked branch's
//! first-parent log.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use chronicle_git::{ChangelogOptions, GitCli, build_changelog};
//!
//! let git = GitCli::new(".");
//! let since = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
//! let options = ChangelogOptions::new("main", since).with_jobs(4);
//! let changelog = build_changelog(&git, &options, None).expect("changelog");
//! println!("{} entries", changelog.entry_count());
//! ```

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::assembler::{BranchChangelog, assemble};
use crate::builder::build_records;
use crate::error::GitError;
use crate::tokenizer::tokenize;
use crate::vcs::VcsQuery;

/// Remote tracked by default
pub const DEFAULT_REMOTE: &str = "origin";

/// Progress callback signature
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Stage of the pipeline, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the full history log
    FullHistory,
    /// Resolving branch names per commit
    Resolving,
    /// Reading the tracked branch log and assembling
    Assembling,
}

/// Progress event during a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A stage started
    Started {
        /// The stage
        stage: Stage,
        /// Number of items in the stage, if known
        total: Option<usize>,
    },
    /// One commit's branch was resolved
    Resolved {
        /// Commits resolved so far
        done: usize,
        /// Commits to resolve
        total: usize,
    },
    /// The changelog is assembled
    Completed {
        /// Branches in the changelog
        branches: usize,
        /// Entries in the changelog
        entries: usize,
    },
}

/// Options for one changelog run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogOptions {
    /// Local name of the tracked branch
    pub branch: String,
    /// Remote the branch is tracked on
    pub remote: String,
    /// Only commits after this date are read
    pub since: NaiveDate,
    /// Name-resolution workers; 1 resolves sequentially
    pub jobs: usize,
}

impl ChangelogOptions {
    /// Options for `branch` on the default remote, resolving sequentially
    #[must_use]
    pub fn new(branch: &str, since: NaiveDate) -> Self {
        Self {
            branch: branch.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            since,
            jobs: 1,
        }
    }

    /// Track the branch on another remote
    #[must_use]
    pub fn with_remote(mut self, remote: &str) -> Self {
        self.remote = remote.to_string();
        self
    }

    /// Resolve names on `jobs` workers
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// The remote-tracking ref, e.g. `origin/main`
    #[must_use]
    pub fn remote_branch(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// Build the per-branch changelog
///
/// # Errors
///
/// Returns `GitError` if any git query fails; nothing partial is returned.
pub fn build_changelog(
    vcs: &dyn VcsQuery,
    options: &ChangelogOptions,
    progress: Option<&ProgressCallback>,
) -> Result<BranchChangelog, GitError> {
    let report = |event: ProgressEvent| {
        if let Some(callback) = progress {
            callback(&event);
        }
    };

    report(ProgressEvent::Started {
        stage: Stage::FullHistory,
        total: None,
    });
    let history = vcs.full_history(options.since)?;
    let raw = tokenize(&history);
    info!(commits = raw.len(), since = %options.since, "Read full history");

    report(ProgressEvent::Started {
        stage: Stage::Resolving,
        total: Some(raw.len()),
    });
    let records = build_records(vcs, raw, &options.remote, options.jobs, &|done, total| {
        report(ProgressEvent::Resolved { done, total });
    })?;
    let unresolved = records.values().filter(|r| r.branch.is_none()).count();
    debug!(records = records.len(), unresolved, "Built commit records");

    report(ProgressEvent::Started {
        stage: Stage::Assembling,
        total: None,
    });
    let remote_branch = options.remote_branch();
    let branch_log = vcs.branch_history(&remote_branch, options.since)?;
    let changelog = assemble(&records, &branch_log);
    info!(
        branch = %remote_branch,
        branches = changelog.len(),
        entries = changelog.entry_count(),
        "Assembled changelog"
    );

    report(ProgressEvent::Completed {
        branches: changelog.len(),
        entries: changelog.entry_count(),
    });
    Ok(changelog)
}
