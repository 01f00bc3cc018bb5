//! Repository provider backed by a JSON snapshot file.
//!
//! This crate is allowed to do filesystem IO. It never talks to the network.

#![forbid(unsafe_code)]

pub mod model;
mod provider;

use anyhow::Context;
use camino::Utf8Path;

pub use model::Snapshot;
pub use provider::SnapshotProvider;

/// Parse snapshot JSON text.
pub fn parse_snapshot(text: &str) -> anyhow::Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(text).context("parse snapshot JSON")?;
    Ok(snapshot)
}

/// Read and parse a snapshot file into a provider.
pub fn load_snapshot(path: &Utf8Path) -> anyhow::Result<SnapshotProvider> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read snapshot {path}"))?;
    let snapshot = parse_snapshot(&text).with_context(|| format!("load snapshot {path}"))?;
    tracing::debug!(
        %path,
        repositories = snapshot.repositories.len(),
        simulated_failures = snapshot.failures.len(),
        "loaded snapshot"
    );
    Ok(SnapshotProvider::new(snapshot))
}
