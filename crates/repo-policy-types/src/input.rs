//! Job inputs received from the dispatch layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Input for a job triggered by a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PullRequestInput {
    /// Full name (`owner/name`) of the repository the pull request targets.
    pub repository_name: String,
    /// Full name of the repository that holds the source branch; differs for forks.
    pub source_repository_name: String,
    pub target_branch_name: String,
    pub source_branch_name: String,
    /// SHA of the commit the job runs on.
    pub commit_sha: String,
}

impl PullRequestInput {
    pub fn validate(&self) -> Result<(), InputError> {
        require("repository_name", &self.repository_name)?;
        require("source_repository_name", &self.source_repository_name)?;
        require("target_branch_name", &self.target_branch_name)?;
        require("source_branch_name", &self.source_branch_name)?;
        require("commit_sha", &self.commit_sha)
    }
}

/// Input for push, workflow dispatch and schedule jobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BranchInput {
    pub repository_name: String,
    pub branch_name: String,
    pub commit_sha: String,
}

impl BranchInput {
    pub fn validate(&self) -> Result<(), InputError> {
        require("repository_name", &self.repository_name)?;
        require("branch_name", &self.branch_name)?;
        require("commit_sha", &self.commit_sha)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::Empty { field });
    }
    Ok(())
}
