//! Fuzz target for snapshot parsing.
//!
//! Goal: The parser should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_snapshot_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = repo_policy_snapshot::parse_snapshot(text);
    }
});
