#![no_main]

//! Fuzz target for command line parsing
//!
//! Arbitrary argument lists must either fail to parse or produce a
//! configuration whose derived values stay in range.

use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use libfuzzer_sys::fuzz_target;

use chronicle::config::Config;

fuzz_target!(|args: Vec<String>| {
    let argv = std::iter::once("chronicle".to_string()).chain(args);
    let Ok(config) = Config::try_parse_from(argv) else {
        return;
    };

    let months = config.lookback_months();
    assert!((1..=12).contains(&months));
    assert!(config.jobs() >= 1);

    if let Some(today) = NaiveDate::from_ymd_opt(2024, 5, 17) {
        assert!(config.since(today) < today);
    }

    let path = config.output_path(Path::new("/repo"), "feature/x");
    assert!(path.extension().is_some());
});
