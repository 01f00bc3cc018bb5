use super::{checked, comment::remove_quote_lines, fork::fork_owner_trusted};
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};
use std::collections::BTreeSet;

pub const EXECUTE_JOB_MESSAGE: &str = "execution not authorized, a comment from a user with write permission or above on the repository approving the workflow was not found on a PR from a fork, the comment should include the string '/canonical/self-hosted-runners/run-workflows <commit SHA>' where the commit SHA is the SHA of the latest commit on the branch";

/// A job for a pull request from an untrusted fork needs an authorization comment for
/// `commit_sha` from a user with write permission or above.
pub fn execute_job<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
    branch_name: &str,
    commit_sha: &str,
) -> Report {
    checked(ids::CHECK_EXECUTE_JOB, || {
        evaluate(
            provider,
            repository_name,
            source_repository_name,
            branch_name,
            commit_sha,
        )
    })
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
    branch_name: &str,
    commit_sha: &str,
) -> Result<Report, ProviderError> {
    if repository_name == source_repository_name
        || fork_owner_trusted(provider, repository_name, source_repository_name)?
    {
        return Ok(Report::pass());
    }

    let pull_request = provider
        .get_open_pull_requests(repository_name)?
        .into_iter()
        .find(|pull_request| pull_request.head_ref == branch_name);
    let Some(pull_request) = pull_request else {
        return Ok(Report::fail(format!(
            "no open pull requests for branch {branch_name}"
        )));
    };
    let context = format!(
        "branch '{branch_name}', commit '{commit_sha}', pull request #{}",
        pull_request.number
    );

    let comments = provider.get_issue_comments(repository_name, pull_request.number)?;
    if comments.is_empty() {
        return Ok(Report::fail(format!(
            "no comment found on PR - {EXECUTE_JOB_MESSAGE}, {context}"
        )));
    }

    let authorization = format!("{} {commit_sha}", ids::AUTHORIZATION_STRING_PREFIX);
    let authors: BTreeSet<&str> = comments
        .iter()
        .filter(|comment| remove_quote_lines(&comment.body).contains(&authorization))
        .map(|comment| comment.author_login.as_str())
        .collect();
    if authors.is_empty() {
        return Ok(Report::fail(format!(
            "authorization comment not found on PR, expected: {authorization} - {EXECUTE_JOB_MESSAGE}, {context}"
        )));
    }

    for author in authors {
        let permission = provider.get_collaborator_permission(repository_name, author)?;
        if permission.can_write() {
            tracing::debug!(author, %permission, "authorization comment accepted");
            return Ok(Report::pass());
        }
        tracing::debug!(author, %permission, "authorization comment author lacks write permission");
    }

    Ok(Report::fail(format!(
        "authorization comment from a user who does not have write permission or above - {EXECUTE_JOB_MESSAGE}, {context}"
    )))
}
