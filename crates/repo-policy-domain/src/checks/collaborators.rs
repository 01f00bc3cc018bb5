use super::checked;
use crate::model::{Affiliation, Permission};
use crate::provider::{ProviderError, RepositoryProvider};
use repo_policy_types::{Report, ids};

/// Outside collaborators must hold read access at most.
pub fn collaborators<P: RepositoryProvider + ?Sized>(provider: &P, repository_name: &str) -> Report {
    checked(ids::CHECK_COLLABORATORS, || evaluate(provider, repository_name))
}

fn evaluate<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
) -> Result<Report, ProviderError> {
    let outside =
        provider.get_collaborators(repository_name, Permission::Triage, Affiliation::Outside)?;

    let mut elevated: Vec<String> = outside
        .into_iter()
        .filter(|collaborator| collaborator.permission() > Permission::Read)
        .map(|collaborator| collaborator.login)
        .collect();
    elevated.sort();
    elevated.dedup();

    if elevated.is_empty() {
        return Ok(Report::pass());
    }
    Ok(Report::fail(format!(
        "the repository includes outside collaborators with higher permissions than read, logins: {}",
        elevated.join(", ")
    )))
}
