//! Fuzz target for comment quote stripping.
//!
//! Goal: stripping is idempotent and leaves no line starting with `>`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_quote_stripping
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use repo_policy_domain::checks::remove_quote_lines;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        let once = remove_quote_lines(body);
        assert_eq!(remove_quote_lines(&once), once);
        assert!(!once.contains('\r'));
        assert!(once.split('\n').all(|line| !line.trim_start().starts_with('>')));
    }
});
