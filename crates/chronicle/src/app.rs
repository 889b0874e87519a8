// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! One chronicle run: checks, pipeline, document

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use chronicle_git::{BranchChangelog, ChangelogOptions, GitCli, VcsQuery, build_changelog};
use tracing::info;

use crate::config::{Config, OutputFormat};
use crate::preflight::{self, Environment};
use crate::progress::Spinner;
use crate::render;

/// The git binary used for every query
pub const GIT_PROGRAM: &str = "git";

/// Generate the changelog for the checked out branch
///
/// Returns the path of the written document. Nothing is written unless
/// every git query succeeded.
///
/// # Errors
///
/// Fails on invalid configuration, a failed preflight check, a failed git
/// query or an unwritable output file.
pub fn run(config: &Config) -> anyhow::Result<PathBuf> {
    config.validate()?;
    let workspace = config
        .workspace_path()
        .context("Cannot determine the current directory")?;

    let version = preflight::check_git_version(OsStr::new(GIT_PROGRAM))?;
    info!(version = %version, "Using git");
    let env = Environment::discover(&workspace, config.remote())?;
    let path = config.output_path(&env.root, &env.branch);
    preflight::check_writable(output_dir(&path, &env.root))?;

    let since = config.since(Local::now().date_naive());
    let options = ChangelogOptions::new(&env.branch, since)
        .with_remote(&env.remote)
        .with_jobs(config.jobs());
    let git = GitCli::new(&env.root);

    let changelog = generate(&git, &options, config.show_progress())
        .with_context(|| format!("Failed to read history of {}", options.remote_branch()))?;

    write_document(&changelog, config.format, &path, Local::now().naive_local())?;
    info!(
        path = %path.display(),
        branches = changelog.len(),
        entries = changelog.entry_count(),
        "Wrote changelog"
    );
    Ok(path)
}

/// Directory the document at `path` lands in
///
/// Falls back to `root` when `path` has no parent.
#[must_use]
pub fn output_dir<'a>(path: &'a Path, root: &'a Path) -> &'a Path {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(root)
}

/// Run the pipeline with a spinner showing its progress
///
/// # Errors
///
/// Returns the first failed git query.
pub fn generate(
    vcs: &dyn VcsQuery,
    options: &ChangelogOptions,
    show_progress: bool,
) -> Result<BranchChangelog, chronicle_git::GitError> {
    let spinner = Spinner::new(show_progress);
    let callback = spinner.callback();
    let result = build_changelog(vcs, options, Some(&callback));
    spinner.finish();
    result
}

/// Render `changelog` and write it to `path`
///
/// Markdown dates are shown in the local time zone.
///
/// # Errors
///
/// Fails if rendering fails or the file can not be written.
pub fn write_document(
    changelog: &BranchChangelog,
    format: OutputFormat,
    path: &Path,
    generated: NaiveDateTime,
) -> anyhow::Result<()> {
    let document = render::render(format, changelog, generated, &Local)
        .context("Failed to render changelog")?;
    fs::write(path, document).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
