// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! chronicle-git: git log parsing for chronicle
//!
//! This library crate reads `git log` text, turns it into typed commit
//! records attributed to the branch each commit was introduced on, and
//! assembles the per-branch changelog of a tracked remote branch.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use chronicle_git::{ChangelogOptions, GitCli, build_changelog};
//!
//! let git = GitCli::new(".");
//! let since = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
//! let changelog = build_changelog(&git, &ChangelogOptions::new("main", since), None)
//!     .expect("build changelog");
//!
//! for (branch, entries) in changelog.iter() {
//!     println!("{branch}: {} commits", entries.len());
//! }
//! ```

pub mod assembler;
pub mod builder;
pub mod commit;
pub mod error;
pub mod pipeline;
pub mod tokenizer;
pub mod vcs;

pub use assembler::{BranchChangelog, ChangelogEntry};
pub use commit::{BranchRef, CommitId, CommitRecord, FileChange, LineCount};
pub use error::GitError;
pub use pipeline::{ChangelogOptions, ProgressCallback, ProgressEvent, Stage, build_changelog};
pub use vcs::{GitCli, VcsQuery};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assembler::{BranchChangelog, ChangelogEntry};
    pub use crate::commit::{CommitId, CommitRecord, FileChange};
    pub use crate::error::GitError;
    pub use crate::pipeline::{ChangelogOptions, build_changelog};
    pub use crate::vcs::{GitCli, VcsQuery};
}
