//! Individual compliance checks.
//!
//! Every public check returns a [`Report`]. Provider failures are converted here, once, into an
//! error report; the underlying error only goes to the log.

use crate::provider::ProviderError;
use repo_policy_types::Report;

/// Return early from a check body when a sub-report did not pass.
macro_rules! bail_unless_pass {
    ($report:expr) => {{
        let report = $report;
        if !report.is_pass() {
            return Ok(report);
        }
    }};
}

mod branch;
mod branch_protection;
mod collaborators;
mod comment;
mod disallow_fork;
mod execute_job;
mod fork;
mod source_branch;
mod target_branch;

pub use branch::{branch_protected, signed_commits_required, unique_commits_signed};
pub use branch_protection::branch_protection;
pub use collaborators::collaborators;
pub use comment::remove_quote_lines;
pub use disallow_fork::pull_request_disallow_fork;
pub use execute_job::{EXECUTE_JOB_MESSAGE, execute_job};
pub use source_branch::source_branch_protection;
pub use target_branch::target_branch_protection;

pub const GENERIC_ERROR_MESSAGE: &str =
    "something went wrong while checking repository policy compliance, see the logs for details";
pub const RATE_LIMIT_MESSAGE: &str = "the repository host rate limit was exceeded while checking repository policy compliance, please wait before retrying";

/// Run a check body, logging its start and outcome, and fold provider errors into the report.
pub(crate) fn checked(name: &str, body: impl FnOnce() -> Result<Report, ProviderError>) -> Report {
    tracing::info!(check = name, "start check");
    let report = match body() {
        Ok(report) => report,
        Err(err) => error_report(name, &err),
    };
    tracing::info!(check = name, result = %report.result(), "check finished");
    report
}

pub(crate) fn error_report(name: &str, err: &ProviderError) -> Report {
    if err.is_rate_limited() {
        tracing::warn!(check = name, error = %err, "provider rate limited");
        return Report::error(RATE_LIMIT_MESSAGE);
    }
    tracing::error!(check = name, kind = err.kind(), error = %err, "provider call failed");
    Report::error(GENERIC_ERROR_MESSAGE)
}
