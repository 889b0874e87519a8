//! chronicle library
//!
//! This module exports the command line configuration, the preflight checks
//! and the document renderers for use in integration tests and as a library.

pub mod app;
pub mod config;
pub mod preflight;
pub mod progress;
pub mod render;
