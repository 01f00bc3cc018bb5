//! Use case orchestration for repo-policy.
//!
//! This crate coordinates settings resolution, the domain engine and rendering. The CLI crate
//! depends on it and only handles argument parsing, provider selection and IO.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod policy;
mod render;
mod report;

pub use check::{CheckInput, CheckOutput, run_check, runtime_error_envelope, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use policy::{print_policy, validate_policy};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_envelope_json, serialize_envelope, write_envelope, write_text};
