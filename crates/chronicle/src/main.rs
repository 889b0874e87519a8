//! chronicle: per-branch changelogs from git history
//!
//! This binary writes a Markdown (or JSON) changelog of the checked out
//! branch, grouping every commit under the branch it was introduced on.

use std::process;

use chronicle::app;
use chronicle::config::Config;
use clap::Parser;
use tracing::debug;

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    debug!(?config, "Starting chronicle");

    match app::run(&config) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
            process::exit(1);
        }
    }
}
