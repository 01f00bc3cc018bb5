//! Policy document parsing, schema validation, and preset resolution.
//!
//! This crate is intentionally IO-free: it validates and resolves documents provided as JSON values.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;
mod schema;

pub use model::{PolicyDocument, PropertyRule};
pub use presets::PolicyPreset;
pub use resolve::{
    CUSTOM_POLICY_LABEL, Overrides, enabled, parse_policy_document, resolve_document,
    resolve_policy,
};
pub use schema::{POLICY_SCHEMA, PolicyParseError, check_schema};

use repo_policy_types::Report;
use serde_json::Value;

/// Validate a raw policy document, as a report.
///
/// A schema violation is a `fail` naming the violation; checks never see such a document.
pub fn validate_policy_document(raw: &Value) -> Report {
    match parse_policy_document(raw) {
        Ok(_) => Report::pass(),
        Err(err) => invalid_policy_report(&err),
    }
}

/// The report for a document that failed to parse.
pub fn invalid_policy_report(err: &PolicyParseError) -> Report {
    Report::fail(format!("invalid policy document, {err}"))
}
