//! Fuzz target for policy document validation and resolution.
//!
//! Goal: validation **never panics**, and every document it accepts resolves for every job type.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_document
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use repo_policy_settings::{Overrides, resolve_policy, validate_policy_document};
use repo_policy_types::JobType;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let report = validate_policy_document(&raw);
    for job_type in JobType::ALL {
        let resolved = resolve_policy(Some(&raw), job_type, &Overrides::default());
        assert_eq!(report.is_pass(), resolved.is_ok());
    }
});
