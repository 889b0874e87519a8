#![no_main]

use chronicle_git::assembler::assemble;
use chronicle_git::builder::build_record;
use chronicle_git::tokenizer::tokenize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let raw = tokenize(text);
        let records = raw
            .iter()
            .map(|(id, group)| (id.clone(), build_record(id, group)))
            .collect();
        let _ = assemble(&records, text);
    }
});
