//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Policy toggles (disabled checks have no effect, all-disabled always passes)
//! - First-failure ordering of job orchestrators
//! - Signed commit lineage and comment quote stripping

use crate::checks::{remove_quote_lines, unique_commits_signed};
use crate::engine::{run_pull_request, run_push, run_schedule, run_workflow_dispatch};
use crate::model::Commit;
use crate::policy::{EffectivePolicy, Toggle};
use crate::provider::ProviderError;
use crate::test_support::{
    FakeProvider, REPO, branch_input, fork_pull_request_input, same_repo_pull_request_input,
};
use proptest::prelude::*;
use repo_policy_types::{CheckResult, JobType, Property, Report};

// ============================================================================
// Strategies
// ============================================================================

const PROVIDER_METHODS: [&str; 9] = [
    "get_repository",
    "get_branch",
    "get_commits",
    "get_commit",
    "get_open_pull_requests",
    "get_issue_comments",
    "get_collaborators",
    "get_collaborator_permission",
    "is_organization_member",
];

fn arb_provider_error() -> impl Strategy<Value = ProviderError> {
    prop_oneof![
        Just(ProviderError::Credentials("bad credentials".to_string())),
        Just(ProviderError::RateLimited("rate limit".to_string())),
        Just(ProviderError::NotFound("missing".to_string())),
        Just(ProviderError::Other("boom".to_string())),
    ]
}

/// A provider in an arbitrary, mostly broken state.
fn arb_hostile_provider() -> impl Strategy<Value = FakeProvider> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec("[a-z]{3,8}", 0..4),
        prop::collection::vec((0..PROVIDER_METHODS.len(), arb_provider_error()), 0..4),
    )
        .prop_map(|(protected, signed, elevated, failures)| {
            let mut provider = FakeProvider::healthy();
            for branch in provider.branches.values_mut() {
                branch.protected = protected;
                branch.requires_signed_commits = signed;
                branch.review_requirement = None;
            }
            for login in elevated {
                provider.add_outside_collaborator(&login, "admin");
            }
            for (method, err) in failures {
                provider.fail(PROVIDER_METHODS[method], err);
            }
            provider
        })
}

fn arb_toggle() -> impl Strategy<Value = Toggle> {
    prop_oneof![
        Just(Toggle::Enabled),
        Just(Toggle::Disabled),
        Just(Toggle::Unspecified),
    ]
}

fn arb_policy() -> impl Strategy<Value = EffectivePolicy> {
    (
        prop::collection::vec(arb_toggle(), JobType::ALL.len() * Property::ALL.len()),
        any::<bool>(),
    )
        .prop_map(|(toggles, absent_default)| {
            let mut policy =
                EffectivePolicy::unspecified("generated").with_absent_default(absent_default);
            let mut cells = toggles.into_iter();
            for job_type in JobType::ALL {
                for property in Property::ALL {
                    if let Some(toggle) = cells.next() {
                        policy.set(job_type, property, toggle);
                    }
                }
            }
            policy
        })
}

fn arb_history() -> impl Strategy<Value = Vec<Commit>> {
    prop::collection::vec(("[a-f0-9]{6}", any::<bool>()), 0..12).prop_map(|commits| {
        commits
            .into_iter()
            .map(|(sha, verified)| Commit { sha, verified })
            .collect()
    })
}

fn arb_comment_body() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop_oneof![Just(""), Just(">"), Just("  >"), Just("a ")],
            "[ a-z>/0-9]{0,20}",
            prop_oneof![Just("\n"), Just("\r\n"), Just("\r")],
        ),
        0..8,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(prefix, rest, newline)| format!("{prefix}{rest}{newline}"))
            .collect::<String>()
    })
}

/// Reason fragment of the first failing property in declared order, if any.
fn expected_first_failure(
    policy: &EffectivePolicy,
    job_type: JobType,
    fails: impl Fn(Property) -> Option<&'static str>,
) -> Option<&'static str> {
    policy
        .enabled_properties(job_type)
        .find_map(fails)
}

fn assert_matches_expectation(
    report: &Report,
    expected: Option<&str>,
) -> Result<(), TestCaseError> {
    match expected {
        None => prop_assert_eq!(report, &Report::pass()),
        Some(fragment) => {
            prop_assert_eq!(report.result(), CheckResult::Fail);
            let reason = report.reason().unwrap_or_default();
            prop_assert!(
                reason.contains(fragment),
                "reason {:?} should contain {:?}",
                reason,
                fragment
            );
        }
    }
    Ok(())
}

// ============================================================================
// Policy toggles
// ============================================================================

proptest! {
    /// With every property disabled no check runs, whatever the repository looks like.
    #[test]
    fn all_disabled_policy_always_passes(provider in arb_hostile_provider()) {
        let policy = EffectivePolicy::all_disabled("off");
        let input = branch_input("main");

        prop_assert_eq!(run_pull_request(&provider, &fork_pull_request_input(), &policy), Report::pass());
        prop_assert_eq!(run_pull_request(&provider, &same_repo_pull_request_input(), &policy), Report::pass());
        prop_assert_eq!(run_push(&provider, &input, &policy), Report::pass());
        prop_assert_eq!(run_workflow_dispatch(&provider, &input, &policy), Report::pass());
        prop_assert_eq!(run_schedule(&provider, &input, &policy), Report::pass());
        prop_assert_eq!(provider.call_count(), 0);
    }

    /// A fork pull request against a repository with optional breakages reports the first
    /// enabled failing property in declared order, and passes when none is enabled.
    #[test]
    fn pull_request_reports_first_enabled_failure(
        policy in arb_policy(),
        break_target in any::<bool>(),
        break_collaborators in any::<bool>(),
    ) {
        let mut provider = FakeProvider::healthy();
        if break_target {
            provider.branches.get_mut("main").unwrap().protected = false;
        }
        if break_collaborators {
            provider.add_outside_collaborator("outsider", "write");
        }

        let expected = expected_first_failure(&policy, JobType::PullRequest, |property| match property {
            Property::TargetBranchProtection if break_target => Some("branch protection not enabled"),
            Property::Collaborators if break_collaborators => Some("outsider"),
            // The fork owner is untrusted and no pull request is open.
            Property::DisallowFork => Some("pull requests from forks are not allowed"),
            Property::ExecuteJob => Some("no open pull requests"),
            _ => None,
        });

        let report = run_pull_request(&provider, &fork_pull_request_input(), &policy);
        assert_matches_expectation(&report, expected)?;
    }

    /// Same as above for push and workflow dispatch jobs.
    #[test]
    fn branch_jobs_report_first_enabled_failure(
        policy in arb_policy(),
        break_branch in any::<bool>(),
        break_collaborators in any::<bool>(),
    ) {
        let mut provider = FakeProvider::healthy();
        if break_branch {
            provider.branches.get_mut("main").unwrap().requires_signed_commits = false;
        }
        if break_collaborators {
            provider.add_outside_collaborator("outsider", "maintain");
        }
        let input = branch_input("main");

        for job_type in [JobType::Push, JobType::WorkflowDispatch] {
            let expected = expected_first_failure(&policy, job_type, |property| match property {
                Property::BranchProtection if break_branch => Some("signed commits not required"),
                Property::Collaborators if break_collaborators => Some("outsider"),
                _ => None,
            });
            let report = match job_type {
                JobType::Push => run_push(&provider, &input, &policy),
                _ => run_workflow_dispatch(&provider, &input, &policy),
            };
            assert_matches_expectation(&report, expected)?;
        }
    }
}

// ============================================================================
// Signed commits and comments
// ============================================================================

proptest! {
    /// A branch whose history is contained in the other branch's history has no unique commits.
    #[test]
    fn contained_history_has_no_unique_unsigned_commits(
        history in arb_history(),
        keep in prop::collection::vec(any::<bool>(), 12),
    ) {
        let subset: Vec<Commit> = history
            .iter()
            .zip(keep.iter())
            .filter(|(_, keep)| **keep)
            .map(|(commit, _)| commit.clone())
            .collect();

        let mut provider = FakeProvider::healthy();
        provider.histories.insert("main".to_string(), history.clone());
        provider.histories.insert("feature/x".to_string(), subset);
        prop_assert_eq!(unique_commits_signed(&provider, REPO, "feature/x", "main"), Report::pass());

        provider.histories.insert("feature/x".to_string(), history);
        prop_assert_eq!(unique_commits_signed(&provider, REPO, "feature/x", "main"), Report::pass());
        prop_assert_eq!(unique_commits_signed(&provider, REPO, "main", "feature/x"), Report::pass());
    }

    /// Stripping quotes is idempotent and leaves no quoted line behind.
    #[test]
    fn quote_stripping_is_idempotent(body in arb_comment_body()) {
        let once = remove_quote_lines(&body);
        let twice = remove_quote_lines(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.contains('\r'));
        prop_assert!(once.lines().all(|line| !line.trim_start().starts_with('>')));
    }

    /// Unquoted lines survive stripping unchanged.
    #[test]
    fn unquoted_lines_survive(lines in prop::collection::vec("[a-z0-9 /]{1,20}", 1..6)) {
        let body = lines.join("\n");
        let stripped = remove_quote_lines(&body);
        for line in &lines {
            prop_assert!(stripped.contains(line.as_str()));
        }
    }
}
