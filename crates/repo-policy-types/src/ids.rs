//! Stable identifiers for job types, policy properties and checks.
//!
//! Property names double as check IDs: a property toggles exactly one check. Wire names are
//! snake_case and must stay in sync with the policy document schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// Checks
pub const CHECK_TARGET_BRANCH_PROTECTION: &str = "target_branch_protection";
pub const CHECK_SOURCE_BRANCH_PROTECTION: &str = "source_branch_protection";
pub const CHECK_BRANCH_PROTECTION: &str = "branch_protection";
pub const CHECK_COLLABORATORS: &str = "collaborators";
pub const CHECK_DISALLOW_FORK: &str = "disallow_fork";
pub const CHECK_EXECUTE_JOB: &str = "execute_job";

/// Literal prefix of the pull request comment that authorizes a job for a fork.
pub const AUTHORIZATION_STRING_PREFIX: &str = "/canonical/self-hosted-runners/run-workflows";

/// Kind of CI job being authorized.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    PullRequest,
    Push,
    WorkflowDispatch,
    Schedule,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::PullRequest,
        JobType::Push,
        JobType::WorkflowDispatch,
        JobType::Schedule,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::PullRequest => "pull_request",
            JobType::Push => "push",
            JobType::WorkflowDispatch => "workflow_dispatch",
            JobType::Schedule => "schedule",
        }
    }

    pub fn parse(s: &str) -> Option<JobType> {
        JobType::ALL.into_iter().find(|job_type| job_type.as_str() == s)
    }

    /// Properties that can be toggled for this job type, in evaluation order.
    ///
    /// Structural checks come first; the comment-based fork authorization comes last.
    pub fn properties(self) -> &'static [Property] {
        match self {
            JobType::PullRequest => &[
                Property::TargetBranchProtection,
                Property::Collaborators,
                Property::DisallowFork,
                Property::ExecuteJob,
            ],
            JobType::Push | JobType::WorkflowDispatch => {
                &[Property::BranchProtection, Property::Collaborators]
            }
            JobType::Schedule => &[Property::Collaborators],
        }
    }

    pub fn supports(self, property: Property) -> bool {
        self.properties().contains(&property)
    }

    /// Dense index used by fixed-size lookup tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A toggleable check in the policy document.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    TargetBranchProtection,
    BranchProtection,
    Collaborators,
    DisallowFork,
    ExecuteJob,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::TargetBranchProtection,
        Property::BranchProtection,
        Property::Collaborators,
        Property::DisallowFork,
        Property::ExecuteJob,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Property::TargetBranchProtection => CHECK_TARGET_BRANCH_PROTECTION,
            Property::BranchProtection => CHECK_BRANCH_PROTECTION,
            Property::Collaborators => CHECK_COLLABORATORS,
            Property::DisallowFork => CHECK_DISALLOW_FORK,
            Property::ExecuteJob => CHECK_EXECUTE_JOB,
        }
    }

    pub fn parse(s: &str) -> Option<Property> {
        Property::ALL.into_iter().find(|property| property.as_str() == s)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
