//! Capability interface for reading repository state.
//!
//! Implementations live outside the domain (JSON snapshot, GitHub REST API, in-memory fakes).
//! Calls are synchronous and blocking; the engine never retries them.

use crate::model::{
    Affiliation, Branch, Collaborator, Comment, Commit, Permission, PullRequest, Repository,
};

/// Classified provider failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("credentials were rejected by the repository host: {0}")]
    Credentials(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }

    /// Stable short name used in logs and snapshot failure injection.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Credentials(_) => "credentials",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::NotFound(_) => "not_found",
            ProviderError::Other(_) => "other",
        }
    }
}

pub trait RepositoryProvider {
    fn get_repository(&self, repository_name: &str) -> Result<Repository, ProviderError>;

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch, ProviderError>;

    /// History reachable from `reference`, most recent first, as far as the provider returns it.
    fn get_commits(
        &self,
        repository_name: &str,
        reference: &str,
    ) -> Result<Vec<Commit>, ProviderError>;

    fn get_commit(&self, repository_name: &str, sha: &str) -> Result<Commit, ProviderError>;

    fn get_open_pull_requests(
        &self,
        repository_name: &str,
    ) -> Result<Vec<PullRequest>, ProviderError>;

    fn get_issue_comments(
        &self,
        repository_name: &str,
        number: u64,
    ) -> Result<Vec<Comment>, ProviderError>;

    /// Collaborators holding at least `permission` and matching `affiliation`.
    fn get_collaborators(
        &self,
        repository_name: &str,
        permission: Permission,
        affiliation: Affiliation,
    ) -> Result<Vec<Collaborator>, ProviderError>;

    /// Effective permission of `login`; [`Permission::None`] for non-collaborators.
    fn get_collaborator_permission(
        &self,
        repository_name: &str,
        login: &str,
    ) -> Result<Permission, ProviderError>;

    fn is_organization_member(&self, _org: &str, _login: &str) -> Result<bool, ProviderError> {
        Ok(false)
    }
}
