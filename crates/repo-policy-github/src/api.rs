//! GitHub REST payloads, trimmed to the fields the checks read.

use repo_policy_domain::model::{
    Branch, BypassAllowances, Collaborator, Comment, Commit, Permission, PullRequest,
    ReviewRequirement,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub full_name: String,
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub struct BranchPayload {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProtectionPayload {
    #[serde(default)]
    pub required_signatures: Option<EnabledPayload>,
    #[serde(default)]
    pub required_pull_request_reviews: Option<ReviewsPayload>,
}

#[derive(Debug, Deserialize)]
pub struct EnabledPayload {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsPayload {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub bypass_pull_request_allowances: Option<BypassPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BypassPayload {
    #[serde(default)]
    pub users: Vec<LoginPayload>,
    #[serde(default)]
    pub teams: Vec<SlugPayload>,
    #[serde(default)]
    pub apps: Vec<SlugPayload>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct SlugPayload {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitPayload {
    pub sha: String,
    pub commit: CommitDetailPayload,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetailPayload {
    #[serde(default)]
    pub verification: Option<VerificationPayload>,
}

#[derive(Debug, Deserialize)]
pub struct VerificationPayload {
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub head: HeadPayload,
}

#[derive(Debug, Deserialize)]
pub struct HeadPayload {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub user: Option<LoginPayload>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorPayload {
    pub login: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionPayload {
    pub permission: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

pub fn branch(branch: BranchPayload, protection: Option<ProtectionPayload>) -> Branch {
    let protection = protection.unwrap_or_default();
    Branch {
        name: branch.name,
        protected: branch.protected,
        requires_signed_commits: protection
            .required_signatures
            .is_some_and(|signatures| signatures.enabled),
        review_requirement: protection
            .required_pull_request_reviews
            .map(|reviews| {
                let bypass = reviews.bypass_pull_request_allowances.unwrap_or_default();
                ReviewRequirement {
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    bypass_allowances: BypassAllowances {
                        users: bypass.users.into_iter().map(|u| u.login).collect(),
                        teams: bypass.teams.into_iter().map(|t| t.slug).collect(),
                        apps: bypass.apps.into_iter().map(|a| a.slug).collect(),
                    },
                }
            }),
    }
}

pub fn commit(payload: CommitPayload) -> Commit {
    Commit {
        sha: payload.sha,
        verified: payload
            .commit
            .verification
            .is_some_and(|verification| verification.verified),
    }
}

pub fn pull_request(payload: PullRequestPayload) -> PullRequest {
    PullRequest {
        number: payload.number,
        head_ref: payload.head.reference,
    }
}

pub fn comment(payload: CommentPayload) -> Comment {
    Comment {
        // Deleted accounts have no user.
        author_login: payload.user.map(|u| u.login).unwrap_or_default(),
        body: payload.body.unwrap_or_default(),
    }
}

pub fn collaborator(payload: CollaboratorPayload) -> Collaborator {
    Collaborator {
        login: payload.login,
        role_name: payload.role_name.unwrap_or_else(|| "read".to_string()),
    }
}

/// Effective permission of a collaborator.
///
/// `permission` is the coarse level (`admin`, `write`, `read`, `none`) and decides write access;
/// `role_name` only refines it upward (`maintain` over `write`). Custom role names never lower it.
pub fn permission(payload: &PermissionPayload) -> Permission {
    let coarse = Permission::from_role_name(&payload.permission);
    let role = payload
        .role_name
        .as_deref()
        .filter(|role| !role.is_empty())
        .map_or(Permission::None, Permission::from_role_name);
    coarse.max(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn protection_maps_signatures_reviews_and_bypass() {
        let branch_payload: BranchPayload =
            serde_json::from_value(json!({ "name": "main", "protected": true })).unwrap();
        let protection: ProtectionPayload = serde_json::from_value(json!({
            "required_signatures": { "enabled": true },
            "required_pull_request_reviews": {
                "dismiss_stale_reviews": true,
                "bypass_pull_request_allowances": {
                    "users": [{ "login": "octocat" }],
                    "teams": [{ "slug": "release" }],
                    "apps": []
                }
            }
        }))
        .unwrap();

        let branch = branch(branch_payload, Some(protection));
        assert!(branch.protected);
        assert!(branch.requires_signed_commits);
        let reviews = branch.review_requirement.unwrap();
        assert!(reviews.dismiss_stale_reviews);
        assert_eq!(reviews.bypass_allowances.users, vec!["octocat".to_string()]);
        assert_eq!(reviews.bypass_allowances.teams, vec!["release".to_string()]);
    }

    #[test]
    fn unprotected_branch_has_no_requirements() {
        let branch_payload: BranchPayload =
            serde_json::from_value(json!({ "name": "dev", "protected": false })).unwrap();
        let branch = branch(branch_payload, None);
        assert!(!branch.protected);
        assert!(!branch.requires_signed_commits);
        assert!(branch.review_requirement.is_none());
    }

    #[test]
    fn commit_verification_defaults_to_unverified() {
        let payload: CommitPayload =
            serde_json::from_value(json!({ "sha": "abc", "commit": {} })).unwrap();
        assert!(!commit(payload).verified);

        let payload: CommitPayload = serde_json::from_value(json!({
            "sha": "def",
            "commit": { "verification": { "verified": true, "reason": "valid" } }
        }))
        .unwrap();
        assert!(commit(payload).verified);
    }

    #[test]
    fn pull_request_head_ref_and_comment_author() {
        let pr: PullRequestPayload =
            serde_json::from_value(json!({ "number": 3, "head": { "ref": "feature", "sha": "x" } }))
                .unwrap();
        assert_eq!(pull_request(pr).head_ref, "feature");

        let ghost: CommentPayload =
            serde_json::from_value(json!({ "user": null, "body": "hi" })).unwrap();
        assert_eq!(comment(ghost).author_login, "");
    }

    #[test]
    fn permission_refines_with_role_name() {
        let payload: PermissionPayload =
            serde_json::from_value(json!({ "permission": "write", "role_name": "maintain" }))
                .unwrap();
        assert_eq!(permission(&payload), Permission::Maintain);

        let payload: PermissionPayload =
            serde_json::from_value(json!({ "permission": "admin" })).unwrap();
        assert_eq!(permission(&payload), Permission::Admin);
    }

    #[test]
    fn custom_role_keeps_coarse_write_access() {
        let payload: PermissionPayload = serde_json::from_value(
            json!({ "permission": "write", "role_name": "release-manager" }),
        )
        .unwrap();
        assert_eq!(permission(&payload), Permission::Write);
        assert!(permission(&payload).can_write());

        let payload: PermissionPayload =
            serde_json::from_value(json!({ "permission": "read", "role_name": "triage" })).unwrap();
        assert_eq!(permission(&payload), Permission::Triage);
        assert!(!permission(&payload).can_write());
    }
}
