use super::branch::{branch_protected, find_unsigned_unique_commit, signed_commits_required};
use super::checked;
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};

/// Protection and signature requirements for the branch a push, workflow dispatch or schedule
/// job runs on, including the commit under test.
pub fn branch_protection<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    commit_sha: &str,
) -> Report {
    checked(ids::CHECK_BRANCH_PROTECTION, || {
        evaluate(provider, repository_name, branch_name, commit_sha)
    })
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    commit_sha: &str,
) -> Result<Report, ProviderError> {
    let branch = provider.get_branch(repository_name, branch_name)?;
    bail_unless_pass!(branch_protected(&branch));
    bail_unless_pass!(signed_commits_required(&branch));

    let repository = provider.get_repository(repository_name)?;
    bail_unless_pass!(find_unsigned_unique_commit(
        provider,
        repository_name,
        branch_name,
        &repository.default_branch,
    )?);

    let commit = provider.get_commit(repository_name, commit_sha)?;
    if !commit.verified {
        return Ok(Report::fail(format!(
            "commit is not signed, commit '{commit_sha}' on branch '{branch_name}'"
        )));
    }

    Ok(Report::pass())
}
