#![no_main]

use chronicle_git::{BranchRef, CommitId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Some(id) = CommitId::new("abc123") {
            if let Some(parsed) = BranchRef::parse(text, &id, "origin") {
                assert!(!parsed.branch.is_empty());
            }
        }
    }
});
