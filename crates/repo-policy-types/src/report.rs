use crate::JobType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for the report envelope written by the CLI.
pub const SCHEMA_REPORT_V1: &str = "repo-policy.report.v1";

/// Outcome of a check or of a whole job orchestration.
///
/// `Fail` is a policy violation the repository owner can act on. `Error` means the check could
/// not be completed (credentials, rate limiting, missing resources) and needs a different fix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckResult {
    Pass,
    Fail,
    Error,
}

impl CheckResult {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckResult::Pass => "pass",
            CheckResult::Fail => "fail",
            CheckResult::Error => "error",
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a check together with the reason it did not pass.
///
/// `reason` is `None` exactly when `result` is [`CheckResult::Pass`]. The constructors are the
/// only way to build a report, and deserialization rejects payloads that break the rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawReport")]
pub struct Report {
    result: CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Report {
    pub fn pass() -> Self {
        Self {
            result: CheckResult::Pass,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::with_reason(CheckResult::Fail, reason.into())
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::with_reason(CheckResult::Error, reason.into())
    }

    fn with_reason(result: CheckResult, reason: String) -> Self {
        // Non-pass reasons are never empty.
        let reason = if reason.trim().is_empty() {
            format!("check result is {result} but no reason was given")
        } else {
            reason
        };
        Self {
            result,
            reason: Some(reason),
        }
    }

    pub fn result(&self) -> CheckResult {
        self.result
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_pass(&self) -> bool {
        self.result == CheckResult::Pass
    }

    pub fn into_parts(self) -> (CheckResult, Option<String>) {
        (self.result, self.reason)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.result, reason),
            None => write!(f, "{}", self.result),
        }
    }
}

#[derive(Deserialize, JsonSchema)]
struct RawReport {
    result: CheckResult,
    #[serde(default)]
    reason: Option<String>,
}

impl TryFrom<RawReport> for Report {
    type Error = String;

    fn try_from(raw: RawReport) -> Result<Self, Self::Error> {
        match (raw.result, raw.reason) {
            (CheckResult::Pass, None) => Ok(Report::pass()),
            (CheckResult::Pass, Some(_)) => Err("a passing report must not carry a reason".into()),
            (_, None) => Err(format!("a {} report requires a reason", raw.result)),
            (result, Some(reason)) if reason.trim().is_empty() => {
                Err(format!("a {result} report requires a non-empty reason"))
            }
            (result, Some(reason)) => Ok(Report::with_reason(result, reason)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Report envelope emitted by the CLI for a single job check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub job_type: JobType,
    /// Which policy document was applied: `default:<preset>` or `custom`.
    pub policy: String,
    pub result: CheckResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReportEnvelope {
    /// Rebuild the report carried by the envelope, enforcing the reason invariant again.
    pub fn report(&self) -> Report {
        match (self.result, self.reason.clone()) {
            (CheckResult::Pass, _) => Report::pass(),
            (CheckResult::Fail, reason) => Report::fail(reason.unwrap_or_default()),
            (CheckResult::Error, reason) => Report::error(reason.unwrap_or_default()),
        }
    }
}
