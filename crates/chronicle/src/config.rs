//! Configuration for the chronicle CLI
//!
//! This module provides the command line options and the values derived from
//! them: the lookback cutoff, the output path and the log level.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Months, NaiveDate};
use chronicle_git::pipeline::DEFAULT_REMOTE;
use clap::{Parser, ValueEnum};
use tracing::warn;

/// Lookback window used when no valid override is given
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// Largest accepted lookback override
pub const MAX_LOOKBACK_MONTHS: u32 = 12;

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown changelog
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// File extension for this format
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

/// Chronicle - per-branch changelogs from git history
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "chronicle")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Directory inside the repository to document
    ///
    /// Defaults to the current working directory. The repository root is
    /// found by walking up from here.
    #[arg(short, long, env = "CHRONICLE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Output file name, without extension
    ///
    /// Relative names are resolved against the repository root.
    /// Defaults to `changelog.<branch>`.
    #[arg(short, long, env = "CHRONICLE_NAME")]
    pub name: Option<String>,

    /// How many months of history to include (1-12, default 3)
    ///
    /// Out of range values are ignored and the default is used.
    #[arg(short, long, env = "CHRONICLE_MONTHS", allow_negative_numbers = true)]
    pub months: Option<i64>,

    /// Remote the current branch is tracked on (default: origin)
    #[arg(short, long, env = "CHRONICLE_REMOTE")]
    pub remote: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Number of parallel `git name-rev` workers (default: 1)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Disable the progress spinner
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// Get the workspace path, using current directory as default
    ///
    /// Returns `None` if no workspace is specified and the current
    /// directory cannot be determined.
    #[must_use]
    pub fn workspace_path(&self) -> Option<PathBuf> {
        self.workspace
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    /// The tracked remote name
    #[must_use]
    pub fn remote(&self) -> &str {
        self.remote
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REMOTE)
    }

    /// Name-resolution worker count, at least 1
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(1).max(1)
    }

    /// Check whether the spinner should be drawn
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }

    /// The lookback window in months
    ///
    /// An override outside 1-12 is rejected with a warning and the default
    /// of 3 months is used.
    #[must_use]
    pub fn lookback_months(&self) -> u32 {
        match self.months {
            None => DEFAULT_LOOKBACK_MONTHS,
            Some(months) => match u32::try_from(months) {
                Ok(m) if (1..=MAX_LOOKBACK_MONTHS).contains(&m) => m,
                _ => {
                    warn!(
                        months,
                        default = DEFAULT_LOOKBACK_MONTHS,
                        "Lookback must be between 1 and 12 months, using the default"
                    );
                    DEFAULT_LOOKBACK_MONTHS
                }
            },
        }
    }

    /// The `--since` cutoff for a run happening on `today`
    #[must_use]
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        lookback_cutoff(today, self.lookback_months())
    }

    /// Where the document for `branch` is written
    ///
    /// `root` is the repository work tree.
    #[must_use]
    pub fn output_path(&self, root: &Path, branch: &str) -> PathBuf {
        let stem = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("changelog.{}", branch.replace('/', "-")),
        };
        root.join(format!("{stem}.{}", self.format.extension()))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace path is specified but doesn't
    /// exist or is not a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref workspace) = self.workspace {
            if !workspace.exists() {
                return Err(ConfigError::WorkspaceNotFound(workspace.clone()));
            }
            if !workspace.is_dir() {
                return Err(ConfigError::WorkspaceNotDirectory(workspace.clone()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// First day of `today`'s month, moved back `months` months
#[must_use]
pub fn lookback_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    first
        .checked_sub_months(Months::new(months))
        .unwrap_or(first)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Workspace path not found
    #[error("Workspace path not found: {0}")]
    WorkspaceNotFound(PathBuf),

    /// Workspace path is not a directory
    #[error("Workspace path is not a directory: {0}")]
    WorkspaceNotDirectory(PathBuf),
}
