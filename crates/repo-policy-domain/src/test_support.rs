use crate::model::{
    Affiliation, Branch, BypassAllowances, Collaborator, Comment, Commit, Permission, PullRequest,
    Repository, ReviewRequirement,
};
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{BranchInput, PullRequestInput};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

pub const REPO: &str = "canonical/repo";
pub const FORK: &str = "contributor/repo";
pub const SHA: &str = "abc123";

/// In-memory provider for a single repository.
#[derive(Debug)]
pub struct FakeProvider {
    pub repository: Repository,
    pub branches: BTreeMap<String, Branch>,
    /// Branch name -> history, most recent first.
    pub histories: BTreeMap<String, Vec<Commit>>,
    pub commits: BTreeMap<String, Commit>,
    pub pull_requests: Vec<PullRequest>,
    pub comments: BTreeMap<u64, Vec<Comment>>,
    pub collaborators: Vec<(Collaborator, Affiliation)>,
    pub permissions: BTreeMap<String, Permission>,
    pub org_members: BTreeSet<String>,
    /// Method name -> error returned instead of data.
    pub failures: BTreeMap<&'static str, ProviderError>,
    calls: Cell<usize>,
}

pub fn commit(sha: &str, verified: bool) -> Commit {
    Commit {
        sha: sha.to_string(),
        verified,
    }
}

pub fn protected_branch(name: &str) -> Branch {
    Branch {
        name: name.to_string(),
        protected: true,
        requires_signed_commits: true,
        review_requirement: Some(ReviewRequirement {
            dismiss_stale_reviews: true,
            require_code_owner_reviews: false,
            bypass_allowances: BypassAllowances::default(),
        }),
    }
}

pub fn comment(author: &str, body: &str) -> Comment {
    Comment {
        author_login: author.to_string(),
        body: body.to_string(),
    }
}

pub fn authorization(sha: &str) -> String {
    format!("{} {sha}", repo_policy_types::ids::AUTHORIZATION_STRING_PREFIX)
}

pub fn branch_input(branch: &str) -> BranchInput {
    BranchInput {
        repository_name: REPO.to_string(),
        branch_name: branch.to_string(),
        commit_sha: SHA.to_string(),
    }
}

pub fn same_repo_pull_request_input() -> PullRequestInput {
    PullRequestInput {
        repository_name: REPO.to_string(),
        source_repository_name: REPO.to_string(),
        target_branch_name: "main".to_string(),
        source_branch_name: "feature/x".to_string(),
        commit_sha: SHA.to_string(),
    }
}

pub fn fork_pull_request_input() -> PullRequestInput {
    PullRequestInput {
        repository_name: REPO.to_string(),
        source_repository_name: FORK.to_string(),
        target_branch_name: "main".to_string(),
        source_branch_name: "fork/feature".to_string(),
        commit_sha: SHA.to_string(),
    }
}

impl FakeProvider {
    /// A repository where every check passes for `main` and `feature/x`.
    pub fn healthy() -> Self {
        let main_history = vec![commit("c1", true), commit("c0", true)];
        let feature_history = vec![commit(SHA, true), commit("c1", true), commit("c0", true)];

        let mut permissions = BTreeMap::new();
        permissions.insert("maintainer".to_string(), Permission::Write);
        permissions.insert("owner".to_string(), Permission::Admin);
        permissions.insert("reader".to_string(), Permission::Read);

        Self {
            repository: Repository {
                full_name: REPO.to_string(),
                default_branch: "main".to_string(),
            },
            branches: [
                ("main".to_string(), protected_branch("main")),
                ("feature/x".to_string(), protected_branch("feature/x")),
            ]
            .into_iter()
            .collect(),
            histories: [
                ("main".to_string(), main_history),
                ("feature/x".to_string(), feature_history),
            ]
            .into_iter()
            .collect(),
            commits: [(SHA.to_string(), commit(SHA, true))].into_iter().collect(),
            pull_requests: Vec::new(),
            comments: BTreeMap::new(),
            collaborators: Vec::new(),
            permissions,
            org_members: BTreeSet::new(),
            failures: BTreeMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    pub fn fail(&mut self, method: &'static str, err: ProviderError) {
        self.failures.insert(method, err);
    }

    pub fn add_outside_collaborator(&mut self, login: &str, role_name: &str) {
        self.collaborators.push((
            Collaborator {
                login: login.to_string(),
                role_name: role_name.to_string(),
            },
            Affiliation::Outside,
        ));
    }

    /// Open a pull request for `head_ref` carrying `comments`.
    pub fn open_pull_request(&mut self, number: u64, head_ref: &str, comments: Vec<Comment>) {
        self.pull_requests.push(PullRequest {
            number,
            head_ref: head_ref.to_string(),
        });
        self.comments.insert(number, comments);
    }

    fn record(&self, method: &'static str) -> Result<(), ProviderError> {
        self.calls.set(self.calls.get() + 1);
        match self.failures.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn ensure_repository(&self, repository_name: &str) -> Result<(), ProviderError> {
        if repository_name == self.repository.full_name {
            Ok(())
        } else {
            Err(ProviderError::NotFound(format!(
                "repository {repository_name}"
            )))
        }
    }
}

impl RepositoryProvider for FakeProvider {
    fn get_repository(&self, repository_name: &str) -> Result<Repository, ProviderError> {
        self.record("get_repository")?;
        self.ensure_repository(repository_name)?;
        Ok(self.repository.clone())
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch, ProviderError> {
        self.record("get_branch")?;
        self.ensure_repository(repository_name)?;
        self.branches
            .get(branch_name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("branch {branch_name}")))
    }

    fn get_commits(
        &self,
        repository_name: &str,
        reference: &str,
    ) -> Result<Vec<Commit>, ProviderError> {
        self.record("get_commits")?;
        self.ensure_repository(repository_name)?;
        self.histories
            .get(reference)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("ref {reference}")))
    }

    fn get_commit(&self, repository_name: &str, sha: &str) -> Result<Commit, ProviderError> {
        self.record("get_commit")?;
        self.ensure_repository(repository_name)?;
        self.commits
            .get(sha)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("commit {sha}")))
    }

    fn get_open_pull_requests(
        &self,
        repository_name: &str,
    ) -> Result<Vec<PullRequest>, ProviderError> {
        self.record("get_open_pull_requests")?;
        self.ensure_repository(repository_name)?;
        Ok(self.pull_requests.clone())
    }

    fn get_issue_comments(
        &self,
        repository_name: &str,
        number: u64,
    ) -> Result<Vec<Comment>, ProviderError> {
        self.record("get_issue_comments")?;
        self.ensure_repository(repository_name)?;
        Ok(self.comments.get(&number).cloned().unwrap_or_default())
    }

    fn get_collaborators(
        &self,
        repository_name: &str,
        permission: Permission,
        affiliation: Affiliation,
    ) -> Result<Vec<Collaborator>, ProviderError> {
        self.record("get_collaborators")?;
        self.ensure_repository(repository_name)?;
        Ok(self
            .collaborators
            .iter()
            .filter(|(_, a)| affiliation == Affiliation::All || *a == affiliation)
            .filter(|(c, _)| c.permission() >= permission)
            .map(|(c, _)| c.clone())
            .collect())
    }

    fn get_collaborator_permission(
        &self,
        repository_name: &str,
        login: &str,
    ) -> Result<Permission, ProviderError> {
        self.record("get_collaborator_permission")?;
        self.ensure_repository(repository_name)?;
        let listed = self
            .collaborators
            .iter()
            .find(|(c, _)| c.login == login)
            .map(|(c, _)| c.permission());
        Ok(self
            .permissions
            .get(login)
            .copied()
            .or(listed)
            .unwrap_or(Permission::None))
    }

    fn is_organization_member(&self, _org: &str, login: &str) -> Result<bool, ProviderError> {
        self.record("is_organization_member")?;
        Ok(self.org_members.contains(login))
    }
}
