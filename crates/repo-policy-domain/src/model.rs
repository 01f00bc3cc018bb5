//! Repository data as seen through a [`RepositoryProvider`](crate::provider::RepositoryProvider).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    /// `owner/name`.
    pub full_name: String,
    pub default_branch: String,
}

impl Repository {
    /// Owner segment of the full name.
    pub fn owner(&self) -> &str {
        owner_of(&self.full_name)
    }
}

/// Owner segment of an `owner/name` repository name.
pub fn owner_of(full_name: &str) -> &str {
    full_name.split('/').next().unwrap_or(full_name)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub protected: bool,
    pub requires_signed_commits: bool,
    /// `None` when pull request reviews are not required.
    pub review_requirement: Option<ReviewRequirement>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewRequirement {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub bypass_allowances: BypassAllowances,
}

/// Actors allowed to merge without satisfying the review requirement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BypassAllowances {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    pub apps: Vec<String>,
}

impl BypassAllowances {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.teams.is_empty() && self.apps.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    /// Whether the hosting service verified the commit signature.
    pub verified: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub head_ref: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub author_login: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collaborator {
    pub login: String,
    /// Role as reported by the hosting service; custom roles keep their own name.
    pub role_name: String,
}

impl Collaborator {
    pub fn permission(&self) -> Permission {
        Permission::from_role_name(&self.role_name)
    }
}

/// Repository permission levels, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    None,
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "read",
            Permission::Triage => "triage",
            Permission::Write => "write",
            Permission::Maintain => "maintain",
            Permission::Admin => "admin",
        }
    }

    /// Map a role or permission name to a level.
    ///
    /// Accepts both UI role names (`read`, `write`) and API permission names (`pull`, `push`).
    /// Unknown names are custom roles and rank as [`Permission::Triage`]: more than read,
    /// less than write.
    pub fn from_role_name(name: &str) -> Permission {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Permission::None,
            "read" | "pull" => Permission::Read,
            "triage" => Permission::Triage,
            "write" | "push" => Permission::Write,
            "maintain" => Permission::Maintain,
            "admin" => Permission::Admin,
            _ => Permission::Triage,
        }
    }

    /// Write (push) or above.
    pub fn can_write(self) -> bool {
        self >= Permission::Write
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship filter for collaborator listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affiliation {
    /// Not a member of the owning organization.
    Outside,
    Direct,
    All,
}

impl Affiliation {
    pub fn as_str(self) -> &'static str {
        match self {
            Affiliation::Outside => "outside",
            Affiliation::Direct => "direct",
            Affiliation::All => "all",
        }
    }
}
