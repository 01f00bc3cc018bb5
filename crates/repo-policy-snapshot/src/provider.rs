use crate::model::{AffiliationSnapshot, FailureKind, RepositorySnapshot, Snapshot};
use repo_policy_domain::model::{
    Affiliation, Branch, BypassAllowances, Collaborator, Comment, Commit, Permission, PullRequest,
    Repository, ReviewRequirement,
};
use repo_policy_domain::provider::{ProviderError, RepositoryProvider};

/// Read-only provider over a [`Snapshot`].
#[derive(Clone, Debug)]
pub struct SnapshotProvider {
    snapshot: Snapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn simulate(&self, method: &str) -> Result<(), ProviderError> {
        let Some(kind) = self.snapshot.failures.get(method) else {
            return Ok(());
        };
        let message = format!("simulated failure in {method}");
        Err(match kind {
            FailureKind::Credentials => ProviderError::Credentials(message),
            FailureKind::RateLimited => ProviderError::RateLimited(message),
            FailureKind::NotFound => ProviderError::NotFound(message),
            FailureKind::Other => ProviderError::Other(message),
        })
    }

    fn repository(&self, method: &str, name: &str) -> Result<&RepositorySnapshot, ProviderError> {
        self.simulate(method)?;
        self.snapshot
            .repositories
            .get(name)
            .ok_or_else(|| ProviderError::NotFound(format!("repository {name}")))
    }
}

impl RepositoryProvider for SnapshotProvider {
    fn get_repository(&self, repository_name: &str) -> Result<Repository, ProviderError> {
        let repo = self.repository("get_repository", repository_name)?;
        Ok(Repository {
            full_name: repository_name.to_string(),
            default_branch: repo.default_branch.clone(),
        })
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch, ProviderError> {
        let repo = self.repository("get_branch", repository_name)?;
        let branch = repo
            .branches
            .get(branch_name)
            .ok_or_else(|| ProviderError::NotFound(format!("branch {branch_name}")))?;
        Ok(Branch {
            name: branch_name.to_string(),
            protected: branch.protected,
            requires_signed_commits: branch.required_signatures,
            review_requirement: branch.required_pull_request_reviews.as_ref().map(|reviews| {
                ReviewRequirement {
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    bypass_allowances: BypassAllowances {
                        users: reviews.bypass_pull_request_allowances.users.clone(),
                        teams: reviews.bypass_pull_request_allowances.teams.clone(),
                        apps: reviews.bypass_pull_request_allowances.apps.clone(),
                    },
                }
            }),
        })
    }

    fn get_commits(
        &self,
        repository_name: &str,
        reference: &str,
    ) -> Result<Vec<Commit>, ProviderError> {
        let repo = self.repository("get_commits", repository_name)?;
        let branch = repo
            .branches
            .get(reference)
            .ok_or_else(|| ProviderError::NotFound(format!("ref {reference}")))?;
        Ok(branch
            .commits
            .iter()
            .map(|commit| Commit {
                sha: commit.sha.clone(),
                verified: commit.verified,
            })
            .collect())
    }

    fn get_commit(&self, repository_name: &str, sha: &str) -> Result<Commit, ProviderError> {
        let repo = self.repository("get_commit", repository_name)?;
        if let Some(state) = repo.commits.get(sha) {
            return Ok(Commit {
                sha: sha.to_string(),
                verified: state.verified,
            });
        }
        repo.branches
            .values()
            .flat_map(|branch| branch.commits.iter())
            .find(|commit| commit.sha == sha)
            .map(|commit| Commit {
                sha: commit.sha.clone(),
                verified: commit.verified,
            })
            .ok_or_else(|| ProviderError::NotFound(format!("commit {sha}")))
    }

    fn get_open_pull_requests(
        &self,
        repository_name: &str,
    ) -> Result<Vec<PullRequest>, ProviderError> {
        let repo = self.repository("get_open_pull_requests", repository_name)?;
        Ok(repo
            .pull_requests
            .iter()
            .map(|pr| PullRequest {
                number: pr.number,
                head_ref: pr.head_ref.clone(),
            })
            .collect())
    }

    fn get_issue_comments(
        &self,
        repository_name: &str,
        number: u64,
    ) -> Result<Vec<Comment>, ProviderError> {
        let repo = self.repository("get_issue_comments", repository_name)?;
        let pr = repo
            .pull_requests
            .iter()
            .find(|pr| pr.number == number)
            .ok_or_else(|| ProviderError::NotFound(format!("pull request #{number}")))?;
        Ok(pr
            .comments
            .iter()
            .map(|comment| Comment {
                author_login: comment.author.clone(),
                body: comment.body.clone(),
            })
            .collect())
    }

    fn get_collaborators(
        &self,
        repository_name: &str,
        permission: Permission,
        affiliation: Affiliation,
    ) -> Result<Vec<Collaborator>, ProviderError> {
        let repo = self.repository("get_collaborators", repository_name)?;
        Ok(repo
            .collaborators
            .iter()
            .filter(|c| match affiliation {
                Affiliation::All | Affiliation::Direct => true,
                Affiliation::Outside => c.affiliation == AffiliationSnapshot::Outside,
            })
            .map(|c| Collaborator {
                login: c.login.clone(),
                role_name: c.role_name.clone(),
            })
            .filter(|c| c.permission() >= permission)
            .collect())
    }

    fn get_collaborator_permission(
        &self,
        repository_name: &str,
        login: &str,
    ) -> Result<Permission, ProviderError> {
        let repo = self.repository("get_collaborator_permission", repository_name)?;
        if let Some(role) = repo.permissions.get(login) {
            return Ok(Permission::from_role_name(role));
        }
        Ok(repo
            .collaborators
            .iter()
            .find(|c| c.login == login)
            .map(|c| Permission::from_role_name(&c.role_name))
            .unwrap_or(Permission::None))
    }

    fn is_organization_member(&self, org: &str, login: &str) -> Result<bool, ProviderError> {
        self.simulate("is_organization_member")?;
        Ok(self
            .snapshot
            .organizations
            .get(org)
            .is_some_and(|members| members.iter().any(|member| member == login)))
    }
}
