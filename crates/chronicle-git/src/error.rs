// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for chronicle-git

use thiserror::Error;

/// Errors that can occur while querying git or assembling a changelog
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be started
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A git invocation exited unsuccessfully
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// A git invocation produced output that is not valid UTF-8
    #[error("`{command}` produced non UTF-8 output")]
    InvalidUtf8 {
        /// The command line whose output could not be decoded
        command: String,
    },

    /// The name-resolution worker pool could not be created
    #[error("Failed to start resolution workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
