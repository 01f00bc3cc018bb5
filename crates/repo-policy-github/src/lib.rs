//! Repository provider backed by the GitHub REST API.
//!
//! Blocking HTTP only. Responses are mapped onto the domain model and every failure is
//! classified into a [`ProviderError`](repo_policy_domain::ProviderError).

#![forbid(unsafe_code)]

mod api;
mod client;

pub use client::{DEFAULT_API_URL, GITHUB_TOKEN_ENV, GithubConfig, GithubProvider};
