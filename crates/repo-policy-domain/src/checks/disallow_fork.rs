use super::{checked, fork::fork_owner_trusted};
use crate::model::owner_of;
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};

/// Pull requests from forks run only when the fork owner is already trusted.
///
/// Unlike [`execute_job`](super::execute_job) there is no comment-based approval.
pub fn pull_request_disallow_fork<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
) -> Report {
    checked(ids::CHECK_DISALLOW_FORK, || {
        evaluate(provider, repository_name, source_repository_name)
    })
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
) -> Result<Report, ProviderError> {
    if repository_name == source_repository_name
        || fork_owner_trusted(provider, repository_name, source_repository_name)?
    {
        return Ok(Report::pass());
    }
    Ok(Report::fail(format!(
        "pull requests from forks are not allowed, the owner '{}' of fork '{}' does not have write or admin privileges on '{}'",
        owner_of(source_repository_name),
        source_repository_name,
        repository_name
    )))
}
