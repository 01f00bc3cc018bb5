use super::{branch::branch_protected, checked};
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};

/// The branch a pull request targets must be protected.
///
/// When it is the default branch, or the pull request comes from a fork, reviews must also be
/// required, stale reviews dismissed, and nobody allowed to bypass them.
pub fn target_branch_protection<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    source_repository_name: &str,
) -> Report {
    checked(ids::CHECK_TARGET_BRANCH_PROTECTION, || {
        evaluate(provider, repository_name, branch_name, source_repository_name)
    })
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    branch_name: &str,
    source_repository_name: &str,
) -> Result<Report, ProviderError> {
    let branch = provider.get_branch(repository_name, branch_name)?;
    bail_unless_pass!(branch_protected(&branch));

    let repository = provider.get_repository(repository_name)?;
    let from_fork = repository_name != source_repository_name;
    if branch_name != repository.default_branch && !from_fork {
        return Ok(Report::pass());
    }

    let Some(reviews) = &branch.review_requirement else {
        return Ok(Report::fail(format!(
            "pull request reviews are not required, branch '{branch_name}'"
        )));
    };
    if !reviews.dismiss_stale_reviews {
        return Ok(Report::fail(format!(
            "stale reviews are not dismissed, branch '{branch_name}'"
        )));
    }
    if !reviews.bypass_allowances.is_empty() {
        return Ok(Report::fail(format!(
            "pull request reviews can be bypassed, branch '{branch_name}'"
        )));
    }

    Ok(Report::pass())
}
