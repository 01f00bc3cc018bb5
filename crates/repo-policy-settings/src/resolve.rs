use crate::model::PolicyDocument;
use crate::presets::PolicyPreset;
use crate::schema::{PolicyParseError, check_schema};
use repo_policy_domain::policy::{EffectivePolicy, Toggle};
use repo_policy_types::{JobType, Property};
use serde_json::Value;

pub const CUSTOM_POLICY_LABEL: &str = "custom";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Apply `all` instead of `allow-fork` to pull requests without a document.
    pub disallow_forks: bool,
    /// Replace the enabled-if-absent default for unmentioned properties.
    pub absent_default: Option<bool>,
}

/// Validate and deserialize a raw policy document.
pub fn parse_policy_document(raw: &Value) -> Result<PolicyDocument, PolicyParseError> {
    check_schema(raw)?;
    serde_json::from_value(raw.clone()).map_err(|e| PolicyParseError::Model(e.to_string()))
}

/// Build the lookup table for a document.
pub fn resolve_document(document: &PolicyDocument, name: impl Into<String>) -> EffectivePolicy {
    let mut policy = EffectivePolicy::unspecified(name);
    for (job_type, rules) in &document.jobs {
        for (property, rule) in rules {
            policy.set(*job_type, *property, Toggle::from_enabled(rule.enabled));
        }
    }
    policy
}

/// Resolve the policy a job runs under: the supplied document when present, otherwise the
/// job type's default preset.
pub fn resolve_policy(
    raw: Option<&Value>,
    job_type: JobType,
    overrides: &Overrides,
) -> Result<EffectivePolicy, PolicyParseError> {
    let policy = match raw {
        Some(raw) => resolve_document(&parse_policy_document(raw)?, CUSTOM_POLICY_LABEL),
        None => {
            let preset = PolicyPreset::default_for(job_type, overrides.disallow_forks);
            resolve_document(&preset.document(), preset.label())
        }
    };
    Ok(match overrides.absent_default {
        Some(enabled) => policy.with_absent_default(enabled),
        None => policy,
    })
}

/// Whether `property` runs for `job_type` under `document`; unmentioned means enabled.
pub fn enabled(job_type: JobType, property: Property, document: &PolicyDocument) -> bool {
    resolve_document(document, CUSTOM_POLICY_LABEL).enabled(job_type, property)
}
