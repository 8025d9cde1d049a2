// src/github/fetch.rs
// =============================================================================
// This module talks to GitHub over HTTPS.
//
// Endpoints:
// - GET {api}/repos/{owner}/{repo}/branches
// - GET {api}/repos/{owner}/{repo}/git/trees/{branch}?recursive=1
// - GET https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}
//
// Requests are unauthenticated, so public rate limits apply. GitHub rejects
// requests without a User-Agent, so the client always sends one.
//
// The GithubApi trait is the seam the browse flow and the viewer depend on;
// GithubClient is the real implementation, tests plug in fakes.
// =============================================================================

use crate::config::HttpConfig;
use crate::github::types::{Branch, TreeEntry, TreeResponse};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Everything that can go wrong while fetching from GitHub.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("cannot find owner/repo in {0:?}")]
    InvalidRepoUrl(String),

    #[error("invalid endpoint {url}: {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} cannot take path segments")]
    BaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The GitHub operations the rest of the program needs.
///
/// Methods return boxed futures so the trait can be used as `&dyn GithubApi`.
pub trait GithubApi: Send + Sync {
    /// Branch list of the repository behind `repo_url`.
    fn branches<'a>(&'a self, repo_url: &'a str)
        -> BoxFuture<'a, Result<Vec<Branch>, GithubError>>;

    /// Flattened recursive tree of `branch`.
    fn tree<'a>(
        &'a self,
        repo_url: &'a str,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TreeEntry>, GithubError>>;

    /// Raw bytes behind a raw-content URL.
    fn raw_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GithubError>>;
}

// Extracts "owner/repo" from a saved repository URL
//
// Everything up to and including the first "github.com/" is dropped.
//
// Example:
//   "https://github.com/rust-lang/rust" -> "rust-lang/rust"
pub fn repo_path(repo_url: &str) -> Result<&str, GithubError> {
    let path = repo_url
        .split_once("github.com/")
        .map(|(_, rest)| rest.trim_matches('/'))
        .unwrap_or_default();

    if path.is_empty() {
        return Err(GithubError::InvalidRepoUrl(repo_url.to_string()));
    }

    Ok(path)
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
///
/// A trailing empty segment ("https://api.github.com/") is dropped first, so
/// bases with and without a final slash give the same URL. Branch names and
/// file paths are split on '/' by the callers; characters such as '#' or '?'
/// inside a segment end up encoded instead of starting a fragment or query.
pub fn push_segments<'s>(
    mut base: Url,
    segments: impl IntoIterator<Item = &'s str>,
) -> Result<Url, GithubError> {
    let name = base.to_string();
    base.path_segments_mut()
        .map_err(|()| GithubError::BaseUrl(name))?
        .pop_if_empty()
        .extend(segments);
    Ok(base)
}

/// reqwest-backed [`GithubApi`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
}

impl GithubClient {
    pub fn new(config: &HttpConfig) -> Result<Self, GithubError> {
        Self::from_builder(Self::builder(config), config)
    }

    fn builder(config: &HttpConfig) -> ClientBuilder {
        Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
    }

    fn from_builder(builder: ClientBuilder, config: &HttpConfig) -> Result<Self, GithubError> {
        // One client per session so connections get reused
        let http = builder.build().map_err(GithubError::Client)?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
        })
    }

    pub fn branches_url(&self, repo_url: &str) -> Result<Url, GithubError> {
        let repo = repo_path(repo_url)?;
        let segments = std::iter::once("repos")
            .chain(repo.split('/'))
            .chain(["branches"]);
        push_segments(self.api_base.clone(), segments)
    }

    pub fn tree_url(&self, repo_url: &str, branch: &str) -> Result<Url, GithubError> {
        let repo = repo_path(repo_url)?;
        let segments = std::iter::once("repos")
            .chain(repo.split('/'))
            .chain(["git", "trees"])
            .chain(branch.split('/'));
        let mut url = push_segments(self.api_base.clone(), segments)?;
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GithubError> {
        let request = self.http.get(url.clone()).header(ACCEPT, GITHUB_JSON);
        let body = self.get_bytes(request, &url).await?;

        serde_json::from_slice(&body).map_err(|source| GithubError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_bytes(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Vec<u8>, GithubError> {
        let request_err = |source: reqwest::Error| GithubError::Request {
            url: url.to_string(),
            source,
        };

        debug!(%url, "GET");
        let response = request.send().await.map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(request_err)?;
        debug!(%url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

impl GithubApi for GithubClient {
    fn branches<'a>(
        &'a self,
        repo_url: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Branch>, GithubError>> {
        async move {
            let url = self.branches_url(repo_url)?;
            self.get_json(url).await
        }
        .boxed()
    }

    fn tree<'a>(
        &'a self,
        repo_url: &'a str,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TreeEntry>, GithubError>> {
        async move {
            let url = self.tree_url(repo_url, branch)?;
            let response: TreeResponse = self.get_json(url).await?;
            if response.truncated {
                // Pagination of huge trees is not attempted
                warn!(repo = repo_url, branch, "tree listing was truncated by GitHub");
            }
            Ok(response.tree)
        }
        .boxed()
    }

    fn raw_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GithubError>> {
        async move {
            let parsed = Url::parse(url).map_err(|source| GithubError::Endpoint {
                url: url.to_string(),
                source,
            })?;
            self.get_bytes(self.http.get(parsed.clone()), &parsed).await
        }
        .boxed()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is BoxFuture?
//    - A heap-allocated, type-erased future: Pin<Box<dyn Future + Send>>
//    - Traits cannot (yet) have async methods that work with `dyn Trait`,
//      so each method returns a BoxFuture instead
//    - .boxed() (from FutureExt) turns an `async move { .. }` block into one
//
// 2. What does the 'a lifetime on the trait methods mean?
//    - The returned future borrows `self` and the string arguments
//    - 'a ties them together: the future cannot outlive what it borrows
//
// 3. Why check status before decoding?
//    - GitHub answers errors (404, 403 rate limit) with JSON too, but in a
//      different shape; treating any non-2xx as an error keeps it simple
// -----------------------------------------------------------------------------
