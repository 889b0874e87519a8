// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Environment checks run before any history is read
//!
//! A run needs a working `git` binary, a repository with a branch checked
//! out, a remote-tracking ref for that branch and a writable work tree.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use git2::{BranchType, Repository};
use regex::Regex;
use tracing::{debug, info};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid version regex"));

/// Preflight errors
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    /// `git --version` could not be run or printed nothing useful
    #[error("Can not get git version, is git installed? ({0})")]
    GitNotFound(String),

    /// `git --version` printed something without a version number
    #[error("Unsupported git version output: {0}")]
    UnsupportedGitVersion(String),

    /// No repository contains the workspace
    #[error("Not inside a git repository: {path}")]
    RepositoryNotFound {
        /// Path searched from
        path: PathBuf,
    },

    /// The repository has no work tree
    #[error("Repository has no work tree: {path}")]
    BareRepository {
        /// Path of the git directory
        path: PathBuf,
    },

    /// HEAD does not point at a branch
    #[error("HEAD is detached, check out a branch first")]
    DetachedHead,

    /// The checked out branch has no commits
    #[error("Branch has no commits yet")]
    UnbornBranch,

    /// The branch has no remote-tracking ref
    #[error("Branch {branch} does not exist on remote {remote}")]
    NoRemoteBranch {
        /// Local branch name
        branch: String,
        /// Remote name
        remote: String,
    },

    /// The output directory can not be written
    #[error("Can not write to {path}: {reason}")]
    NotWritable {
        /// Directory checked
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Any other libgit2 failure
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

/// Pull the `x.y.z` version out of `git --version` output
///
/// Returns `None` unless the output says `git version` and carries a
/// three-part version number.
#[must_use]
pub fn parse_git_version(output: &str) -> Option<&str> {
    let rest = &output[output.find("git version")?..];
    VERSION_RE.find(rest).map(|m| m.as_str())
}

/// Check that `program` is a usable git binary, returning its version
///
/// # Errors
///
/// Returns `PreflightError::GitNotFound` when the program can not be run or
/// fails, and `PreflightError::UnsupportedGitVersion` when its output has no
/// version number.
pub fn check_git_version(program: &OsStr) -> Result<String, PreflightError> {
    let output = Command::new(program)
        .arg("--version")
        .output()
        .map_err(|e| PreflightError::GitNotFound(e.to_string()))?;

    if !output.status.success() {
        return Err(PreflightError::GitNotFound(output.status.to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = parse_git_version(&stdout)
        .ok_or_else(|| PreflightError::UnsupportedGitVersion(stdout.trim().to_string()))?;
    debug!(version, "Found git");
    Ok(version.to_string())
}

/// Check that files can be created in `dir`
///
/// # Errors
///
/// Returns `PreflightError::NotWritable` if the directory is read-only or a
/// marker file can not be created and removed.
pub fn check_writable(dir: &Path) -> Result<(), PreflightError> {
    let not_writable = |reason: String| PreflightError::NotWritable {
        path: dir.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(dir).map_err(|e| not_writable(e.to_string()))?;
    if metadata.permissions().readonly() {
        return Err(not_writable("directory is read-only".to_string()));
    }

    let marker = dir.join(format!(".chronicle-write-check-{}", std::process::id()));
    fs::write(&marker, b"").map_err(|e| not_writable(e.to_string()))?;
    fs::remove_file(&marker).map_err(|e| not_writable(e.to_string()))?;
    Ok(())
}

/// The repository a run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Work tree root
    pub root: PathBuf,
    /// Checked out branch
    pub branch: String,
    /// Remote the branch is tracked on
    pub remote: String,
}

impl Environment {
    /// Find the repository containing `workspace` and its current branch
    ///
    /// # Errors
    ///
    /// Fails if no repository is found, the repository is bare, HEAD is
    /// detached, or `<remote>/<branch>` does not exist.
    pub fn discover(workspace: &Path, remote: &str) -> Result<Self, PreflightError> {
        let repo =
            Repository::discover(workspace).map_err(|_| PreflightError::RepositoryNotFound {
                path: workspace.to_path_buf(),
            })?;

        let root = repo
            .workdir()
            .ok_or_else(|| PreflightError::BareRepository {
                path: repo.path().to_path_buf(),
            })?
            .to_path_buf();

        let head = repo.head().map_err(|e| {
            if e.code() == git2::ErrorCode::UnbornBranch {
                PreflightError::UnbornBranch
            } else {
                PreflightError::Git(e)
            }
        })?;
        if !head.is_branch() {
            return Err(PreflightError::DetachedHead);
        }
        let branch = head
            .shorthand()
            .ok_or(PreflightError::DetachedHead)?
            .to_string();

        let tracking = format!("{remote}/{branch}");
        if repo.find_branch(&tracking, BranchType::Remote).is_err() {
            return Err(PreflightError::NoRemoteBranch {
                branch,
                remote: remote.to_string(),
            });
        }

        info!(root = %root.display(), branch, remote, "Found repository");
        Ok(Self {
            root,
            branch,
            remote: remote.to_string(),
        })
    }
}
