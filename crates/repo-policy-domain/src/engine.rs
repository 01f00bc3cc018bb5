use crate::checks;
use crate::policy::EffectivePolicy;
use crate::provider::RepositoryProvider;
use repo_policy_types::{BranchInput, InputError, JobType, Property, PullRequestInput, Report};

/// Input for any job type.
#[derive(Clone, Copy, Debug)]
pub enum JobInput<'a> {
    PullRequest(&'a PullRequestInput),
    Push(&'a BranchInput),
    WorkflowDispatch(&'a BranchInput),
    Schedule(&'a BranchInput),
}

impl JobInput<'_> {
    pub fn job_type(&self) -> JobType {
        match self {
            JobInput::PullRequest(_) => JobType::PullRequest,
            JobInput::Push(_) => JobType::Push,
            JobInput::WorkflowDispatch(_) => JobType::WorkflowDispatch,
            JobInput::Schedule(_) => JobType::Schedule,
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        match self {
            JobInput::PullRequest(input) => input.validate(),
            JobInput::Push(input) | JobInput::WorkflowDispatch(input) | JobInput::Schedule(input) => {
                input.validate()
            }
        }
    }
}

/// Run the enabled checks for a job in declared order and return the first non-passing report.
pub fn run_job<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: JobInput<'_>,
    policy: &EffectivePolicy,
) -> Report {
    let job_type = input.job_type();
    if let Err(err) = input.validate() {
        tracing::warn!(%job_type, error = %err, "rejecting job input");
        return Report::fail(format!("invalid input, {err}"));
    }
    tracing::debug!(%job_type, policy = %policy.name, "evaluating job");

    for property in policy.enabled_properties(job_type) {
        let report = run_property(provider, input, property);
        if !report.is_pass() {
            tracing::info!(%job_type, %property, result = %report.result(), "job not authorized");
            return report;
        }
    }

    tracing::info!(%job_type, "job authorized");
    Report::pass()
}

fn run_property<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: JobInput<'_>,
    property: Property,
) -> Report {
    match property {
        Property::TargetBranchProtection => match input {
            JobInput::PullRequest(pr) => checks::target_branch_protection(
                provider,
                &pr.repository_name,
                &pr.target_branch_name,
                &pr.source_repository_name,
            ),
            _ => unsupported(input, property),
        },
        Property::DisallowFork => match input {
            JobInput::PullRequest(pr) => checks::pull_request_disallow_fork(
                provider,
                &pr.repository_name,
                &pr.source_repository_name,
            ),
            _ => unsupported(input, property),
        },
        Property::ExecuteJob => match input {
            JobInput::PullRequest(pr) => checks::execute_job(
                provider,
                &pr.repository_name,
                &pr.source_repository_name,
                &pr.source_branch_name,
                &pr.commit_sha,
            ),
            _ => unsupported(input, property),
        },
        Property::BranchProtection => match input {
            JobInput::Push(branch) | JobInput::WorkflowDispatch(branch) => {
                checks::branch_protection(
                    provider,
                    &branch.repository_name,
                    &branch.branch_name,
                    &branch.commit_sha,
                )
            }
            _ => unsupported(input, property),
        },
        Property::Collaborators => {
            let repository_name = match input {
                JobInput::PullRequest(pr) => &pr.repository_name,
                JobInput::Push(branch)
                | JobInput::WorkflowDispatch(branch)
                | JobInput::Schedule(branch) => &branch.repository_name,
            };
            checks::collaborators(provider, repository_name)
        }
    }
}

/// A property with no check for this job type is an error, never a silent pass.
fn unsupported(input: JobInput<'_>, property: Property) -> Report {
    let job_type = input.job_type();
    tracing::error!(%job_type, %property, "no check for property");
    Report::error(checks::GENERIC_ERROR_MESSAGE)
}

pub fn run_pull_request<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &PullRequestInput,
    policy: &EffectivePolicy,
) -> Report {
    run_job(provider, JobInput::PullRequest(input), policy)
}

pub fn run_push<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: &EffectivePolicy,
) -> Report {
    run_job(provider, JobInput::Push(input), policy)
}

pub fn run_workflow_dispatch<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: &EffectivePolicy,
) -> Report {
    run_job(provider, JobInput::WorkflowDispatch(input), policy)
}

pub fn run_schedule<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: &BranchInput,
    policy: &EffectivePolicy,
) -> Report {
    run_job(provider, JobInput::Schedule(input), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Toggle;
    use crate::test_support::{
        FakeProvider, branch_input, fork_pull_request_input, same_repo_pull_request_input,
    };
    use repo_policy_types::CheckResult;

    fn enabled_policy() -> EffectivePolicy {
        EffectivePolicy::unspecified("test")
    }

    #[test]
    fn healthy_repository_passes_every_job_type() {
        let provider = FakeProvider::healthy();
        let policy = enabled_policy();
        let input = branch_input("main");

        assert_eq!(
            run_pull_request(&provider, &same_repo_pull_request_input(), &policy),
            Report::pass()
        );
        assert_eq!(run_push(&provider, &input, &policy), Report::pass());
        assert_eq!(run_workflow_dispatch(&provider, &input, &policy), Report::pass());
        assert_eq!(run_schedule(&provider, &input, &policy), Report::pass());
    }

    #[test]
    fn empty_input_field_fails_before_any_provider_call() {
        let provider = FakeProvider::healthy();
        let mut input = branch_input("main");
        input.commit_sha = String::new();

        let report = run_push(&provider, &input, &enabled_policy());
        assert_eq!(report.result(), CheckResult::Fail);
        assert_eq!(
            report.reason(),
            Some("invalid input, commit_sha must not be empty")
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn first_failure_in_declared_order_wins() {
        let mut provider = FakeProvider::healthy();
        provider.branches.get_mut("main").unwrap().protected = false;
        provider.add_outside_collaborator("contractor", "admin");

        let report = run_push(&provider, &branch_input("main"), &enabled_policy());
        assert_eq!(report.result(), CheckResult::Fail);
        assert!(report.reason().unwrap().contains("branch protection not enabled"));

        let mut policy = enabled_policy();
        policy.set(JobType::Push, Property::BranchProtection, Toggle::Disabled);
        let report = run_push(&provider, &branch_input("main"), &policy);
        assert!(report.reason().unwrap().contains("contractor"));
    }

    #[test]
    fn schedule_only_audits_collaborators() {
        let mut provider = FakeProvider::healthy();
        provider.branches.get_mut("main").unwrap().protected = false;

        let report = run_schedule(&provider, &branch_input("main"), &enabled_policy());
        assert_eq!(report, Report::pass());
    }

    #[test]
    fn property_without_check_for_job_type_is_an_error() {
        let provider = FakeProvider::healthy();
        let input = branch_input("main");

        for (job, property) in [
            (JobInput::Schedule(&input), Property::BranchProtection),
            (JobInput::Push(&input), Property::ExecuteJob),
            (JobInput::WorkflowDispatch(&input), Property::DisallowFork),
            (JobInput::Schedule(&input), Property::TargetBranchProtection),
        ] {
            let report = run_property(&provider, job, property);
            assert_eq!(report.result(), CheckResult::Error, "{property}");
            assert_eq!(report.reason(), Some(checks::GENERIC_ERROR_MESSAGE));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn fork_pull_request_without_authorization_fails_on_disallow_fork_first() {
        let provider = FakeProvider::healthy();

        let report = run_pull_request(&provider, &fork_pull_request_input(), &enabled_policy());
        assert_eq!(report.result(), CheckResult::Fail);
        assert!(
            report
                .reason()
                .unwrap()
                .contains("pull requests from forks are not allowed")
        );

        let mut policy = enabled_policy();
        policy.set(JobType::PullRequest, Property::DisallowFork, Toggle::Disabled);
        let report = run_pull_request(&provider, &fork_pull_request_input(), &policy);
        assert!(report.reason().unwrap().contains("no open pull requests"));
    }
}
