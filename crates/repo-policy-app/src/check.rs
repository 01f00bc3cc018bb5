//! The `check` use case: resolve the policy, run the job, produce a report envelope.

use anyhow::Context;
use repo_policy_domain::engine::{JobInput, run_job};
use repo_policy_domain::provider::RepositoryProvider;
use repo_policy_settings::{
    CUSTOM_POLICY_LABEL, Overrides, PolicyPreset, invalid_policy_report, resolve_policy,
};
use repo_policy_types::{CheckResult, JobType, Report, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    pub job: JobInput<'a>,
    /// Policy document text; `None` applies the job type's default preset.
    pub policy_text: Option<&'a str>,
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub envelope: ReportEnvelope,
    pub report: Report,
}

/// Run the check use case against `provider`.
///
/// Policy violations, invalid documents and provider failures all land in the envelope. The
/// error path is reserved for policy text that is not JSON at all.
pub fn run_check<P: RepositoryProvider + ?Sized>(
    provider: &P,
    input: CheckInput<'_>,
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let job_type = input.job.job_type();

    let raw = input
        .policy_text
        .map(|text| serde_json::from_str::<serde_json::Value>(text).context("parse policy JSON"))
        .transpose()?;

    let (label, report) = match resolve_policy(raw.as_ref(), job_type, &input.overrides) {
        Ok(policy) => {
            let report = run_job(provider, input.job, &policy);
            (policy.name, report)
        }
        Err(err) => {
            tracing::warn!(job_type = job_type.as_str(), error = %err, "rejecting policy document");
            (CUSTOM_POLICY_LABEL.to_string(), invalid_policy_report(&err))
        }
    };

    let finished_at = OffsetDateTime::now_utc();
    let envelope = envelope(job_type, label, &report, started_at, finished_at);
    Ok(CheckOutput { envelope, report })
}

/// Envelope for a check that could not run at all.
pub fn runtime_error_envelope(
    job_type: JobType,
    policy_text_present: bool,
    overrides: &Overrides,
    message: &str,
) -> ReportEnvelope {
    let now = OffsetDateTime::now_utc();
    let label = if policy_text_present {
        CUSTOM_POLICY_LABEL.to_string()
    } else {
        PolicyPreset::default_for(job_type, overrides.disallow_forks).label()
    };
    envelope(job_type, label, &Report::error(message), now, now)
}

fn envelope(
    job_type: JobType,
    policy: String,
    report: &Report,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> ReportEnvelope {
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "repo-policy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        job_type,
        policy,
        result: report.result(),
        reason: report.reason().map(str::to_string),
    }
}

/// Map a result to an exit code: 0 = pass, 2 = fail, 1 = error.
pub fn verdict_exit_code(result: CheckResult) -> i32 {
    match result {
        CheckResult::Pass => 0,
        CheckResult::Fail => 2,
        CheckResult::Error => 1,
    }
}
