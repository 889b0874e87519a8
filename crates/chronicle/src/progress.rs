// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Terminal spinner fed by pipeline progress events

use std::time::Duration;

use chronicle_git::{ProgressCallback, ProgressEvent, Stage};
use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &[&str] = &["-", "/", "|", "\\", "*"];

/// A spinner on stderr, hidden when disabled or not on a terminal
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create the spinner and start ticking it
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICK_CHARS);
        bar.set_style(style);
        if enabled {
            bar.enable_steady_tick(Duration::from_millis(120));
        }
        Self { bar }
    }

    /// Callback updating the spinner message for each pipeline event
    #[must_use]
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |event| bar.set_message(describe(event)))
    }

    /// The message currently shown
    #[must_use]
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Stop the spinner and clear its line
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// One-line description of a pipeline event
#[must_use]
pub fn describe(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Started {
            stage: Stage::FullHistory,
            ..
        } => "Reading history".to_string(),
        ProgressEvent::Started {
            stage: Stage::Resolving,
            total,
        } => format!("Resolving branches (0/{})", total.unwrap_or(0)),
        ProgressEvent::Started {
            stage: Stage::Assembling,
            ..
        } => "Assembling changelog".to_string(),
        ProgressEvent::Resolved { done, total } => {
            format!("Resolving branches ({done}/{total})")
        }
        ProgressEvent::Completed { branches, entries } => {
            format!("Done: {entries} entries on {branches} branches")
        }
    }
}
