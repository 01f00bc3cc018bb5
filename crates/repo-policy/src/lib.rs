//! Public facade: run a job's policy checks against a raw policy document.
//!
//! The document is validated and resolved once per call; checks only ever see a resolved
//! [`EffectivePolicy`].

#![forbid(unsafe_code)]

use serde_json::Value;

pub use repo_policy_domain::engine::JobInput;
pub use repo_policy_domain::model;
pub use repo_policy_domain::{EffectivePolicy, ProviderError, RepositoryProvider};
pub use repo_policy_settings::{Overrides, PolicyPreset, validate_policy_document};
pub use repo_policy_types::{BranchInput, CheckResult, JobType, Property, PullRequestInput, Report};

/// Resolve `policy` for the input's job type and run the job.
///
/// An invalid document yields a `fail` report and no provider call is made.
pub fn run<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: JobInput<'_>,
    policy: Option<&Value>,
    overrides: &Overrides,
) -> Report {
    let job_type = input.job_type();
    let effective = match repo_policy_settings::resolve_policy(policy, job_type, overrides) {
        Ok(effective) => effective,
        Err(err) => {
            tracing::warn!(job_type = job_type.as_str(), error = %err, "rejecting policy document");
            return repo_policy_settings::invalid_policy_report(&err);
        }
    };
    tracing::debug!(job_type = job_type.as_str(), policy = %effective.name, "resolved policy");
    repo_policy_domain::run_job(provider, input, &effective)
}

pub fn pull_request<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &PullRequestInput,
    policy: Option<&Value>,
) -> Report {
    run(provider, JobInput::PullRequest(input), policy, &Overrides::default())
}

pub fn push<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: Option<&Value>,
) -> Report {
    run(provider, JobInput::Push(input), policy, &Overrides::default())
}

pub fn workflow_dispatch<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: Option<&Value>,
) -> Report {
    run(provider, JobInput::WorkflowDispatch(input), policy, &Overrides::default())
}

pub fn schedule<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: Option<&Value>,
) -> Report {
    run(provider, JobInput::Schedule(input), policy, &Overrides::default())
}
