use super::branch::{branch_protected, find_unsigned_unique_commit, signed_commits_required};
use super::checked;
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};

/// An internal source branch must be protected, require signatures, and only add signed commits
/// on top of the target branch. Branches in forks are not checked.
pub fn source_branch_protection<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
    branch_name: &str,
    target_branch_name: &str,
) -> Report {
    checked(ids::CHECK_SOURCE_BRANCH_PROTECTION, || {
        if repository_name != source_repository_name {
            return Ok(Report::pass());
        }
        evaluate(provider, repository_name, branch_name, target_branch_name)
    })
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    target_branch_name: &str,
) -> Result<Report, ProviderError> {
    let branch = provider.get_branch(repository_name, branch_name)?;
    bail_unless_pass!(branch_protected(&branch));
    bail_unless_pass!(signed_commits_required(&branch));
    find_unsigned_unique_commit(provider, repository_name, branch_name, target_branch_name)
}
