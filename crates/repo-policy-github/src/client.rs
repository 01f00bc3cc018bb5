use crate::api;
use anyhow::Context;
use repo_policy_domain::model::{
    Affiliation, Branch, Collaborator, Comment, Commit, Permission, PullRequest, Repository,
};
use repo_policy_domain::provider::{ProviderError, RepositoryProvider};
use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

const PER_PAGE: u32 = 100;
/// Upper bound on followed pages per listing.
const MAX_PAGES: usize = 10;

#[derive(Clone, Debug)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl GithubConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking GitHub REST client implementing [`RepositoryProvider`].
#[derive(Clone, Debug)]
pub struct GithubProvider {
    client: Client,
    base_url: Url,
}

impl GithubProvider {
    pub fn new(config: GithubConfig) -> anyhow::Result<Self> {
        if config.token.trim().is_empty() {
            anyhow::bail!(
                "the {GITHUB_TOKEN_ENV} environment variable was not provided or is empty, it is needed for interactions with GitHub"
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .context("token is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("repo-policy/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("build GitHub HTTP client")?;

        let base_url = Url::parse(&config.api_url)
            .with_context(|| format!("invalid GitHub API URL: {}", config.api_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("invalid GitHub API URL: {}", config.api_url);
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ProviderError> {
        endpoint(&self.base_url, segments, query)
    }

    fn send(&self, url: &Url) -> Result<Response, ProviderError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ProviderError::Other(format!("request to {url} failed: {e}")))?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(error_for(response, url))
    }

    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        self.send(&url)?
            .json::<T>()
            .map_err(|e| ProviderError::Other(format!("decode {url}: {e}")))
    }

    /// Fetch a listing, following `rel="next"` links up to [`MAX_PAGES`].
    fn get_all<T: DeserializeOwned>(&self, mut first: Url) -> Result<Vec<T>, ProviderError> {
        first
            .query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());
        let path = first.path().to_string();
        let mut url = Some(first);
        let mut items = Vec::new();
        let mut pages = 0;

        while let Some(current) = url.take() {
            if pages == MAX_PAGES {
                tracing::warn!(%path, pages, "stopping pagination at page limit");
                break;
            }
            let response = self.send(&current)?;
            url = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link)
                .and_then(|link| Url::parse(&link).ok());
            let page: Vec<T> = response
                .json()
                .map_err(|e| ProviderError::Other(format!("decode {current}: {e}")))?;
            items.extend(page);
            pages += 1;
        }
        Ok(items)
    }
}

/// Classify a non-success response.
fn error_for(response: Response, url: &Url) -> ProviderError {
    let status = response.status();
    let remaining = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().unwrap_or_default();
    let err = classify(status, remaining.as_deref(), &body, url.as_str());
    tracing::warn!(%status, kind = err.kind(), %url, "GitHub request failed");
    err
}

pub(crate) fn classify(
    status: StatusCode,
    rate_limit_remaining: Option<&str>,
    body: &str,
    url: &str,
) -> ProviderError {
    let detail = format!("{status} from {url}");
    let rate_limited = rate_limit_remaining == Some("0")
        || body.to_ascii_lowercase().contains("rate limit");
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Credentials(detail),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(detail),
        StatusCode::FORBIDDEN if rate_limited => ProviderError::RateLimited(detail),
        StatusCode::NOT_FOUND => ProviderError::NotFound(detail),
        _ => ProviderError::Other(detail),
    }
}

/// Build an endpoint URL below `base`.
///
/// Each path segment and query value is percent-encoded, so branch names, refs and logins
/// containing `/`, `#`, `?`, `%`, `&` or `+` address the resource they name.
pub(crate) fn endpoint(
    base: &Url,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ProviderError::Other(format!("API URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Path segments of a repository endpoint; `owner/name` spans two segments.
fn repo_path<'a>(repository_name: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["repos"];
    segments.extend(repository_name.split('/'));
    segments.extend_from_slice(rest);
    segments
}

/// Extract the `rel="next"` target from a `Link` header.
pub(crate) fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|param| param.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

impl RepositoryProvider for GithubProvider {
    fn get_repository(&self, repository_name: &str) -> Result<Repository, ProviderError> {
        let repo: api::RepositoryPayload =
            self.get(self.url(&repo_path(repository_name, &[]), &[])?)?;
        Ok(Repository {
            full_name: repo.full_name,
            default_branch: repo.default_branch,
        })
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch, ProviderError> {
        let branch: api::BranchPayload = self.get(self.url(
            &repo_path(repository_name, &["branches", branch_name]),
            &[],
        )?)?;
        let protection = if branch.protected {
            Some(self.get::<api::ProtectionPayload>(self.url(
                &repo_path(repository_name, &["branches", branch_name, "protection"]),
                &[],
            )?)?)
        } else {
            None
        };
        Ok(api::branch(branch, protection))
    }

    fn get_commits(
        &self,
        repository_name: &str,
        reference: &str,
    ) -> Result<Vec<Commit>, ProviderError> {
        let commits: Vec<api::CommitPayload> = self.get_all(self.url(
            &repo_path(repository_name, &["commits"]),
            &[("sha", reference)],
        )?)?;
        Ok(commits.into_iter().map(api::commit).collect())
    }

    fn get_commit(&self, repository_name: &str, sha: &str) -> Result<Commit, ProviderError> {
        let commit: api::CommitPayload =
            self.get(self.url(&repo_path(repository_name, &["commits", sha]), &[])?)?;
        Ok(api::commit(commit))
    }

    fn get_open_pull_requests(
        &self,
        repository_name: &str,
    ) -> Result<Vec<PullRequest>, ProviderError> {
        let pulls: Vec<api::PullRequestPayload> = self.get_all(self.url(
            &repo_path(repository_name, &["pulls"]),
            &[("state", "open")],
        )?)?;
        Ok(pulls.into_iter().map(api::pull_request).collect())
    }

    fn get_issue_comments(
        &self,
        repository_name: &str,
        number: u64,
    ) -> Result<Vec<Comment>, ProviderError> {
        let number = number.to_string();
        let comments: Vec<api::CommentPayload> = self.get_all(self.url(
            &repo_path(repository_name, &["issues", number.as_str(), "comments"]),
            &[],
        )?)?;
        Ok(comments.into_iter().map(api::comment).collect())
    }

    fn get_collaborators(
        &self,
        repository_name: &str,
        permission: Permission,
        affiliation: Affiliation,
    ) -> Result<Vec<Collaborator>, ProviderError> {
        let collaborators: Vec<api::CollaboratorPayload> = self.get_all(self.url(
            &repo_path(repository_name, &["collaborators"]),
            &[
                ("permission", api_permission(permission)),
                ("affiliation", affiliation.as_str()),
            ],
        )?)?;
        Ok(collaborators.into_iter().map(api::collaborator).collect())
    }

    fn get_collaborator_permission(
        &self,
        repository_name: &str,
        login: &str,
    ) -> Result<Permission, ProviderError> {
        let url = self.url(
            &repo_path(repository_name, &["collaborators", login, "permission"]),
            &[],
        )?;
        match self.get::<api::PermissionPayload>(url) {
            Ok(payload) => Ok(api::permission(&payload)),
            // Unknown users hold no permission.
            Err(ProviderError::NotFound(_)) => Ok(Permission::None),
            Err(err) => Err(err),
        }
    }

    fn is_organization_member(&self, org: &str, login: &str) -> Result<bool, ProviderError> {
        let url = self.url(&["orgs", org, "members", login], &[])?;
        match self.send(&url) {
            Ok(response) => Ok(response.status() == StatusCode::NO_CONTENT),
            Err(ProviderError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Permission filter names used by the collaborators endpoint.
fn api_permission(permission: Permission) -> &'static str {
    match permission {
        Permission::None | Permission::Read => "pull",
        Permission::Triage => "triage",
        Permission::Write => "push",
        Permission::Maintain => "maintain",
        Permission::Admin => "admin",
    }
}
