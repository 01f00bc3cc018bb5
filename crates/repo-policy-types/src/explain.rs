//! Explain registry for checks.
//!
//! Maps check IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Setting or comment that would fail the check.
    pub before: &'static str,
    /// Setting or comment that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CHECK_TARGET_BRANCH_PROTECTION => Some(explain_target_branch_protection()),
        ids::CHECK_SOURCE_BRANCH_PROTECTION => Some(explain_source_branch_protection()),
        ids::CHECK_BRANCH_PROTECTION => Some(explain_branch_protection()),
        ids::CHECK_COLLABORATORS => Some(explain_collaborators()),
        ids::CHECK_DISALLOW_FORK => Some(explain_disallow_fork()),
        ids::CHECK_EXECUTE_JOB => Some(explain_execute_job()),
        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_TARGET_BRANCH_PROTECTION,
        ids::CHECK_SOURCE_BRANCH_PROTECTION,
        ids::CHECK_BRANCH_PROTECTION,
        ids::CHECK_COLLABORATORS,
        ids::CHECK_DISALLOW_FORK,
        ids::CHECK_EXECUTE_JOB,
    ]
}

fn explain_target_branch_protection() -> Explanation {
    Explanation {
        title: "Target Branch Protection",
        description: "\
Checks the branch a pull request targets.

The branch must have protection enabled. When the branch is the repository's default branch,
or the pull request comes from a fork, reviews must also be meaningful:
- pull request reviews are required
- stale reviews are dismissed when new commits are pushed
- nobody (user, team or app) may bypass the review requirement",
        remediation: "\
In the repository settings, add a branch protection rule for the branch and enable
\"Require a pull request before merging\" with \"Dismiss stale pull request approvals when new
commits are pushed\". Remove every entry from \"Allow specified actors to bypass required pull
requests\".",
        examples: ExamplePair {
            before: r#"{
  "required_pull_request_reviews": {
    "dismiss_stale_reviews": false,
    "bypass_pull_request_allowances": { "users": ["octocat"] }
  }
}"#,
            after: r#"{
  "required_pull_request_reviews": {
    "dismiss_stale_reviews": true,
    "bypass_pull_request_allowances": { "users": [], "teams": [], "apps": [] }
  }
}"#,
        },
    }
}

fn explain_source_branch_protection() -> Explanation {
    Explanation {
        title: "Source Branch Protection",
        description: "\
Checks the branch a pull request comes from when it lives in the same repository.

The branch must be protected, must require signed commits, and every commit it adds on top of
the target branch must carry a verified signature. Branches in forks are skipped.",
        remediation: "\
Protect the branch, enable \"Require signed commits\", and re-sign any unsigned commits
(for example with `git rebase --exec 'git commit --amend --no-edit -S' <target>`).",
        examples: ExamplePair {
            before: r#"{ "protected": true, "required_signatures": false }"#,
            after: r#"{ "protected": true, "required_signatures": true }"#,
        },
    }
}

fn explain_branch_protection() -> Explanation {
    Explanation {
        title: "Branch Protection",
        description: "\
Checks the branch a push, workflow dispatch or schedule job runs on.

The branch must be protected and require signed commits. Every commit on the branch that is
not on the default branch must be signed, and so must the commit the job runs on.",
        remediation: "\
Protect the branch, enable \"Require signed commits\", and make sure every commit pushed to
it is signed with a key registered on the hosting service.",
        examples: ExamplePair {
            before: r#"{ "protected": false }"#,
            after: r#"{ "protected": true, "required_signatures": true }"#,
        },
    }
}

fn explain_collaborators() -> Explanation {
    Explanation {
        title: "Outside Collaborators",
        description: "\
Checks that outside collaborators (people who are not members of the owning organization)
have at most read access to the repository.

Elevated access for outside collaborators signals a governance gap independent of any single
job run.",
        remediation: "\
Lower the role of every listed outside collaborator to \"Read\", or invite them to the
organization through the normal membership process.",
        examples: ExamplePair {
            before: r#"[{ "login": "contractor", "role_name": "write" }]"#,
            after: r#"[{ "login": "contractor", "role_name": "read" }]"#,
        },
    }
}

fn explain_disallow_fork() -> Explanation {
    Explanation {
        title: "Disallow Forks",
        description: "\
Rejects pull requests from forks unless the owner of the fork has write permission or above
on the repository. Unlike the execute_job check there is no comment based approval path.",
        remediation: "\
Push the branch to the repository itself, or ask a maintainer to grant the fork owner write
access. Alternatively disable `disallow_fork` in the policy document and rely on execute_job.",
        examples: ExamplePair {
            before: r#"{ "pull_request": { "disallow_fork": { "enabled": true } } }"#,
            after: r#"{ "pull_request": { "disallow_fork": { "enabled": false } } }"#,
        },
    }
}

fn explain_execute_job() -> Explanation {
    Explanation {
        title: "Execute Job Authorization",
        description: "\
Checks that a job for a pull request from a fork has been approved.

Forks owned by users with write permission or above are trusted. For any other fork, a user
with write permission or above must comment on the open pull request with
`/canonical/self-hosted-runners/run-workflows <commit SHA>`, where the SHA is the latest
commit on the branch. Quoted lines (starting with `>`) are ignored.",
        remediation: "\
Review the changes in the pull request, then post the authorization comment for the exact
commit SHA as a user with write permission or above. A new push needs a new comment.",
        examples: ExamplePair {
            before: "> /canonical/self-hosted-runners/run-workflows 0a1b2c3",
            after: "/canonical/self-hosted-runners/run-workflows 0a1b2c3",
        },
    }
}
