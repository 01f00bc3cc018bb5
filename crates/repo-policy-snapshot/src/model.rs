//! Snapshot file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Keyed by full name (`owner/name`).
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositorySnapshot>,
    /// Organization -> member logins.
    #[serde(default)]
    pub organizations: BTreeMap<String, Vec<String>>,
    /// Provider method name -> simulated failure.
    #[serde(default)]
    pub failures: BTreeMap<String, FailureKind>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySnapshot {
    pub default_branch: String,
    #[serde(default)]
    pub branches: BTreeMap<String, BranchSnapshot>,
    /// Commits addressable by SHA that are not listed in a branch history.
    #[serde(default)]
    pub commits: BTreeMap<String, CommitState>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequestSnapshot>,
    #[serde(default)]
    pub collaborators: Vec<CollaboratorSnapshot>,
    /// Login -> permission or role name.
    #[serde(default)]
    pub permissions: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchSnapshot {
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub required_signatures: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_pull_request_reviews: Option<ReviewsSnapshot>,
    /// Most recent first.
    #[serde(default)]
    pub commits: Vec<CommitSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewsSnapshot {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub bypass_pull_request_allowances: BypassSnapshot,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BypassSnapshot {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub apps: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitSnapshot {
    pub sha: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitState {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PullRequestSnapshot {
    pub number: u64,
    pub head_ref: String,
    #[serde(default)]
    pub comments: Vec<CommentSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentSnapshot {
    pub author: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollaboratorSnapshot {
    pub login: String,
    pub role_name: String,
    #[serde(default)]
    pub affiliation: AffiliationSnapshot,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationSnapshot {
    #[default]
    Outside,
    Direct,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Credentials,
    RateLimited,
    NotFound,
    Other,
}
