use repo_policy_types::{JobType, Property};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Policy document: job type -> property -> rule.
///
/// Only construct this from a schema-validated value (see [`crate::parse_policy_document`]) or a
/// preset; deserialization alone does not check that a property belongs to its job type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyDocument {
    pub jobs: BTreeMap<JobType, BTreeMap<Property, PropertyRule>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyRule {
    pub enabled: bool,
}

impl PolicyDocument {
    /// Every property of every job type set to `enabled`.
    pub fn uniform(enabled: bool) -> Self {
        let mut doc = Self::default();
        for job_type in JobType::ALL {
            for property in job_type.properties() {
                doc.set(job_type, *property, enabled);
            }
        }
        doc
    }

    pub fn set(&mut self, job_type: JobType, property: Property, enabled: bool) {
        self.jobs
            .entry(job_type)
            .or_default()
            .insert(property, PropertyRule { enabled });
    }

    /// The stored flag, or `None` when the document does not mention the property.
    pub fn get(&self, job_type: JobType, property: Property) -> Option<bool> {
        self.jobs
            .get(&job_type)
            .and_then(|rules| rules.get(&property))
            .map(|rule| rule.enabled)
    }
}
