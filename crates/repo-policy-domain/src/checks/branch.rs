use super::checked;
use crate::model::Branch;
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::Report;
use std::collections::HashSet;

pub fn branch_protected(branch: &Branch) -> Report {
    if !branch.protected {
        return Report::fail(format!(
            "branch protection not enabled, branch '{}'",
            branch.name
        ));
    }
    Report::pass()
}

pub fn signed_commits_required(branch: &Branch) -> Report {
    if !branch.requires_signed_commits {
        return Report::fail(format!(
            "signed commits not required, branch '{}'",
            branch.name
        ));
    }
    Report::pass()
}

/// Every commit on `branch_name` that is not on `other_branch_name` must be signed.
///
/// Only the history the provider returns is inspected.
pub fn unique_commits_signed<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    other_branch_name: &str,
) -> Report {
    checked("unique_commits_signed", || {
        find_unsigned_unique_commit(provider, repository_name, branch_name, other_branch_name)
    })
}

pub(super) fn find_unsigned_unique_commit<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    other_branch_name: &str,
) -> Result<Report, ProviderError> {
    let other: HashSet<String> = provider
        .get_commits(repository_name, other_branch_name)?
        .into_iter()
        .map(|commit| commit.sha)
        .collect();

    let unsigned = provider
        .get_commits(repository_name, branch_name)?
        .into_iter()
        .find(|commit| !other.contains(&commit.sha) && !commit.verified);

    Ok(match unsigned {
        Some(commit) => Report::fail(format!(
            "commit is not signed, commit '{}' on branch '{}'",
            commit.sha, branch_name
        )),
        None => Report::pass(),
    })
}
