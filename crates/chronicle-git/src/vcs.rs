// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git queries
//!
//! [`VcsQuery`] is the blocking interface the pipeline reads history through.
//! [`GitCli`] implements it by running the `git` binary in a work tree.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::commit::CommitId;
use crate::error::GitError;

/// Read-only history queries used to build a changelog
///
/// Every call blocks until the answer is available.
pub trait VcsQuery: Sync {
    /// Log of all refs since `since`, with `--numstat` file lines, merges excluded
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the query fails.
    fn full_history(&self, since: NaiveDate) -> Result<String, GitError>;

    /// First-parent log of `branch` (e.g. `origin/main`) since `since`, merges excluded
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the query fails.
    fn branch_history(&self, branch: &str, since: NaiveDate) -> Result<String, GitError>;

    /// Symbolic name of a commit, as printed by `git name-rev`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the query fails.
    fn resolve_name(&self, id: &CommitId) -> Result<String, GitError>;
}

/// [`VcsQuery`] backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
    workdir: PathBuf,
}

impl GitCli {
    /// Run `git` from `PATH` inside `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("git"),
            workdir: workdir.into(),
        }
    }

    /// Use a specific git executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// The directory commands run in
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git with `args` and return its standard output
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if git cannot be started,
    /// `GitError::CommandFailed` on a non-zero exit and
    /// `GitError::InvalidUtf8` if stdout is not UTF-8.
    pub fn run(&self, args: &[String]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        trace!(%command, workdir = %self.workdir.display(), "Running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| GitError::InvalidUtf8 {
            command: command.clone(),
        })?;
        debug!(%command, bytes = stdout.len(), "git finished");
        Ok(stdout)
    }
}

fn since_arg(since: NaiveDate) -> String {
    format!("--since={}", since.format("%Y-%m-%d"))
}

/// Pin the log layout so `format.pretty`, `log.date` and similar settings
/// in the user's config can not change it
const FORMAT_ARGS: [&str; 6] = [
    "--pretty=medium",
    "--date=default",
    "--no-abbrev-commit",
    "--no-show-signature",
    "--no-decorate",
    "--no-color",
];

/// Arguments for the full-history log
#[must_use]
pub fn full_history_args(since: NaiveDate) -> Vec<String> {
    vec![
        "log".to_string(),
        "--all".to_string(),
        since_arg(since),
        "--numstat".to_string(),
        "--no-merges".to_string(),
    ]
    .into_iter()
    .chain(FORMAT_ARGS.iter().map(|arg| (*arg).to_string()))
    .collect()
}

/// Arguments for the first-parent log of one branch
#[must_use]
pub fn branch_history_args(branch: &str, since: NaiveDate) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--first-parent".to_string(),
        branch.to_string(),
        since_arg(since),
        "--no-merges".to_string(),
    ];
    args.extend(FORMAT_ARGS.iter().map(|arg| (*arg).to_string()));
    args.push("--".to_string());
    args
}

impl VcsQuery for GitCli {
    fn full_history(&self, since: NaiveDate) -> Result<String, GitError> {
        self.run(&full_history_args(since))
    }

    fn branch_history(&self, branch: &str, since: NaiveDate) -> Result<String, GitError> {
        self.run(&branch_history_args(branch, since))
    }

    fn resolve_name(&self, id: &CommitId) -> Result<String, GitError> {
        self.run(&["name-rev".to_string(), id.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn since() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    #[test]
    fn test_full_history_args() {
        let args = full_history_args(since());
        assert_eq!(args[0].as_str(), "log");
        assert!(args.contains(&"--all".to_string()));
        assert!(args.contains(&"--since=2024-01-01".to_string()));
        assert!(args.contains(&"--numstat".to_string()));
        assert!(args.contains(&"--no-merges".to_string()));
    }

    #[test]
    fn test_log_args_pin_format() {
        for args in [
            full_history_args(since()),
            branch_history_args("origin/main", since()),
        ] {
            assert!(args.contains(&"--pretty=medium".to_string()));
            assert!(args.contains(&"--date=default".to_string()));
            assert!(args.contains(&"--no-abbrev-commit".to_string()));
        }
    }

    #[test]
    fn test_branch_history_args() {
        let args = branch_history_args("origin/main", since());
        assert_eq!(
            args.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "log",
                "--first-parent",
                "origin/main",
                "--since=2024-01-01",
                "--no-merges",
                "--pretty=medium",
                "--date=default",
                "--no-abbrev-commit",
                "--no-show-signature",
                "--no-decorate",
                "--no-color",
                "--",
            ]
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let git = GitCli::new(std::env::temp_dir()).with_program("chronicle-no-such-git-binary");
        let result = git.run(&["--version".to_string()]);
        assert!(matches!(result, Err(GitError::Spawn { .. })));
    }

    #[test]
    fn test_workdir() {
        let git = GitCli::new("/tmp/repo");
        assert_eq!(git.workdir(), Path::new("/tmp/repo"));
    }
}
