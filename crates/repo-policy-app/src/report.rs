//! Report envelope IO.

use anyhow::Context;
use camino::Utf8Path;
use repo_policy_types::{ReportEnvelope, SCHEMA_REPORT_V1};

/// Parse an envelope, rejecting other schema identifiers.
pub fn parse_envelope_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let envelope: ReportEnvelope = serde_json::from_str(text).context("parse report json")?;
    if envelope.schema != SCHEMA_REPORT_V1 {
        anyhow::bail!(
            "unknown report schema: {} (expected {SCHEMA_REPORT_V1})",
            envelope.schema
        );
    }
    Ok(envelope)
}

pub fn serialize_envelope(envelope: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(envelope).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

/// Write an envelope, creating parent directories.
pub fn write_envelope(path: &Utf8Path, envelope: &ReportEnvelope) -> anyhow::Result<()> {
    let data = serialize_envelope(envelope)?;
    create_parent(path)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))
}

/// Write text, creating parent directories.
pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))
}

fn create_parent(path: &Utf8Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    Ok(())
}
