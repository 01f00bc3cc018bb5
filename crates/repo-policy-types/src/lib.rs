//! Stable DTOs and IDs used across the repo-policy workspace.
//!
//! This crate is intentionally boring:
//! - the check result and report vocabulary
//! - job types, policy properties and check IDs
//! - job inputs and their validation
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod input;
pub mod report;

pub use explain::{ExamplePair, Explanation, all_check_ids, lookup_explanation};
pub use ids::{JobType, Property};
pub use input::{BranchInput, InputError, PullRequestInput};
pub use report::{CheckResult, Report, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta};
