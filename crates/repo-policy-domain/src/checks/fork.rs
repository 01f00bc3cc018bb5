use crate::model::owner_of;
use crate::provider::{ProviderError, RepositoryProvider};

/// Whether the owner of the source repository may run jobs without per-commit approval.
///
/// Trusted owners hold write permission or above on the base repository, or belong to the
/// organization that owns it.
pub(super) fn fork_owner_trusted<P: RepositoryProvider + ?Sized>(
    provider: &P,
    repository_name: &str,
    source_repository_name: &str,
) -> Result<bool, ProviderError> {
    let fork_owner = owner_of(source_repository_name);
    let permission = provider.get_collaborator_permission(repository_name, fork_owner)?;
    if permission.can_write() {
        tracing::debug!(fork_owner, %permission, "fork owner has write permission");
        return Ok(true);
    }

    let org = owner_of(repository_name);
    let member = provider.is_organization_member(org, fork_owner)?;
    if member {
        tracing::debug!(fork_owner, org, "fork owner is an organization member");
    }
    Ok(member)
}
