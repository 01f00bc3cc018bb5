//! Pure policy evaluation (no IO).
//!
//! Input: a job input, a resolved policy, and a repository provider constructed elsewhere.
//! Output: a single [`Report`](repo_policy_types::Report) for the job.

#![forbid(unsafe_code)]

pub mod checks;
pub mod engine;
pub mod model;
pub mod policy;
pub mod provider;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;

pub use engine::{
    JobInput, run_job, run_pull_request, run_push, run_schedule, run_workflow_dispatch,
};
pub use policy::{ENABLED_IF_ABSENT, EffectivePolicy, Toggle};
pub use provider::{ProviderError, RepositoryProvider};
