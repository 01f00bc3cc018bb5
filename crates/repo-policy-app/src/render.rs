//! Render use cases: markdown and GitHub annotations from a report envelope.

use repo_policy_types::{CheckResult, ReportEnvelope};

pub fn render_markdown(envelope: &ReportEnvelope) -> String {
    let mut out = String::new();

    out.push_str("# repo-policy report\n\n");
    let result = match envelope.result {
        CheckResult::Pass => "PASS",
        CheckResult::Fail => "FAIL",
        CheckResult::Error => "ERROR",
    };
    out.push_str(&format!(
        "- Job: `{}`\n- Policy: `{}`\n- Result: **{}**\n\n",
        envelope.job_type.as_str(),
        envelope.policy,
        result
    ));

    match &envelope.reason {
        Some(reason) => {
            for line in reason.lines() {
                out.push_str(&format!("> {line}\n"));
            }
        }
        None => out.push_str("All enabled checks passed.\n"),
    }

    out
}

/// Render a non-passing envelope as a GitHub Actions workflow command.
///
/// Format: `::error title=repo-policy {job} {result}::{reason}`
pub fn render_annotations(envelope: &ReportEnvelope) -> Vec<String> {
    let Some(reason) = envelope.reason.as_deref() else {
        return Vec::new();
    };
    if envelope.result == CheckResult::Pass {
        return Vec::new();
    }

    let message = reason
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    vec![format!(
        "::error title=repo-policy {} {}::{}",
        envelope.job_type.as_str(),
        envelope.result,
        message
    )]
}
