//! Policy document tooling: validation and preset printing.

use anyhow::Context;
use repo_policy_settings::PolicyPreset;
use repo_policy_types::Report;

/// Validate policy document text; non-JSON input is an error, schema violations a `fail`.
pub fn validate_policy(text: &str) -> anyhow::Result<Report> {
    let raw: serde_json::Value = serde_json::from_str(text).context("parse policy JSON")?;
    Ok(repo_policy_settings::validate_policy_document(&raw))
}

/// Pretty JSON for a preset document.
pub fn print_policy(preset: PolicyPreset) -> anyhow::Result<String> {
    let mut text =
        serde_json::to_string_pretty(&preset.document()).context("serialize policy document")?;
    text.push('\n');
    Ok(text)
}
