// src/viewer/raw.rs
// =============================================================================
// Raw-content URLs and loading a file for display.
//
// GitHub serves unrendered file bytes from raw.githubusercontent.com:
//   https://github.com/acme/widget  +  main  +  README.md
//   -> https://raw.githubusercontent.com/acme/widget/main/README.md
//
// Binary files are not previewed; we only report their size.
// =============================================================================

use crate::browse::NavigationContext;
use crate::github::{push_segments, repo_path, GithubApi, GithubError};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

const RAW_HOST: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("loading was cancelled")]
    Cancelled,

    #[error(transparent)]
    Fetch(#[from] GithubError),
}

/// Builds the raw-content URL for a file.
///
/// Only "owner/repo" is taken from `repo_url`; the host is always
/// raw.githubusercontent.com, whatever host spelling the saved URL used.
pub fn raw_url(repo_url: &str, branch: &str, path: &str) -> Result<Url, GithubError> {
    let repo = repo_path(repo_url)?;
    let base = Url::parse(RAW_HOST).map_err(|source| GithubError::Endpoint {
        url: RAW_HOST.to_string(),
        source,
    })?;

    let segments = repo.split('/').chain(branch.split('/')).chain(path.split('/'));
    push_segments(base, segments)
}

/// What the viewer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Text { text: String },
    Binary { bytes: usize },
    /// The URL was resolved but not downloaded
    NotLoaded,
}

impl PageContent {
    /// Text when the payload is UTF-8 without NUL bytes, otherwise binary.
    pub fn classify(body: Vec<u8>) -> Self {
        if body.contains(&0) {
            return PageContent::Binary { bytes: body.len() };
        }
        match String::from_utf8(body) {
            Ok(text) => PageContent::Text { text },
            Err(e) => PageContent::Binary {
                bytes: e.as_bytes().len(),
            },
        }
    }
}

/// A file ready for the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    #[serde(flatten)]
    pub context: NavigationContext,
    pub url: String,
    pub content: PageContent,
}

impl Page {
    /// A page that only knows its URL.
    pub fn unloaded(context: NavigationContext) -> Result<Self, GithubError> {
        let url = raw_url(context.repository_url(), context.branch(), context.file_path())?;
        Ok(Self {
            context,
            url: url.into(),
            content: PageContent::NotLoaded,
        })
    }
}

/// Downloads the file behind `context`. The download races `cancel`.
pub async fn open_file(
    api: &dyn GithubApi,
    context: NavigationContext,
    cancel: &CancellationToken,
) -> Result<Page, ViewerError> {
    let mut page = Page::unloaded(context)?;
    info!(url = %page.url, "loading: {}", page.context.file_path());

    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ViewerError::Cancelled),
        body = api.raw_file(&page.url) => body?,
    };

    page.content = PageContent::classify(body);
    debug!(url = %page.url, content = ?content_kind(&page.content), "file loaded");
    Ok(page)
}

fn content_kind(content: &PageContent) -> &'static str {
    match content {
        PageContent::Text { .. } => "text",
        PageContent::Binary { .. } => "binary",
        PageContent::NotLoaded => "not loaded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGithub;

    fn raw(repo_url: &str, branch: &str, path: &str) -> String {
        raw_url(repo_url, branch, path).unwrap().into()
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(
            raw("https://github.com/acme/widget", "main", "README.md"),
            "https://raw.githubusercontent.com/acme/widget/main/README.md"
        );
        assert_eq!(
            raw("https://github.com/acme/widget", "dev", "src/lib/mod.rs"),
            "https://raw.githubusercontent.com/acme/widget/dev/src/lib/mod.rs"
        );
    }

    #[test]
    fn test_raw_url_only_swaps_the_host() {
        assert_eq!(
            raw("https://github.com/acme/github.com-mirror", "main", "README.md"),
            "https://raw.githubusercontent.com/acme/github.com-mirror/main/README.md"
        );
        assert_eq!(
            raw("https://www.github.com/acme/widget", "main", "README.md"),
            "https://raw.githubusercontent.com/acme/widget/main/README.md"
        );
        assert_eq!(
            raw("http://github.com/acme/widget", "main", "README.md"),
            "https://raw.githubusercontent.com/acme/widget/main/README.md"
        );
    }

    #[test]
    fn test_raw_url_encodes_segments() {
        assert_eq!(
            raw("https://github.com/acme/widget", "main", "docs/what?.md"),
            "https://raw.githubusercontent.com/acme/widget/main/docs/what%3F.md"
        );
        assert_eq!(
            raw("https://github.com/acme/widget", "release#2", "notes #1.txt"),
            "https://raw.githubusercontent.com/acme/widget/release%232/notes%20%231.txt"
        );
        assert_eq!(
            raw("https://github.com/acme/widget", "feature/x", "a.txt"),
            "https://raw.githubusercontent.com/acme/widget/feature/x/a.txt"
        );
    }

    #[test]
    fn test_raw_url_needs_owner_and_repo() {
        let err = raw_url("https://github.com/", "main", "a.txt").unwrap_err();
        assert!(matches!(err, GithubError::InvalidRepoUrl(_)));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            PageContent::classify(b"hello\n".to_vec()),
            PageContent::Text {
                text: "hello\n".to_string()
            }
        );
        assert_eq!(
            PageContent::classify(vec![0x89, b'P', b'N', b'G', 0, 0]),
            PageContent::Binary { bytes: 6 }
        );
        assert_eq!(
            PageContent::classify(vec![0xff, 0xfe, 0xfd]),
            PageContent::Binary { bytes: 3 }
        );
    }

    #[tokio::test]
    async fn test_open_file_fetches_raw_url() {
        let url = "https://raw.githubusercontent.com/acme/widget/main/README.md";
        let api = FakeGithub::new(&[], &[]).with_file(url, b"# Widget\n");
        let context = NavigationContext::new("https://github.com/acme/widget", "main", "README.md");

        let page = open_file(&api, context, &CancellationToken::new()).await.unwrap();

        assert_eq!(api.raw_calls(), vec![url]);
        assert_eq!(page.url, url);
        assert_eq!(
            page.content,
            PageContent::Text {
                text: "# Widget\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_open_file_missing() {
        let api = FakeGithub::new(&[], &[]);
        let context = NavigationContext::new("https://github.com/acme/widget", "main", "gone.txt");

        let err = open_file(&api, context, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ViewerError::Fetch(GithubError::Status { .. })));
    }

    #[tokio::test]
    async fn test_open_file_cancelled() {
        let api = FakeGithub::stalled();
        let context = NavigationContext::new("https://github.com/acme/widget", "main", "a.txt");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = open_file(&api, context, &cancel).await.unwrap_err();
        assert!(matches!(err, ViewerError::Cancelled));
    }

    #[test]
    fn test_page_json() {
        let context = NavigationContext::new("https://github.com/acme/widget", "main", "README.md");
        let json = serde_json::to_value(Page::unloaded(context).unwrap()).unwrap();

        assert_eq!(json["repository_url"], "https://github.com/acme/widget");
        assert_eq!(json["branch"], "main");
        assert_eq!(json["file_path"], "README.md");
        assert_eq!(
            json["url"],
            "https://raw.githubusercontent.com/acme/widget/main/README.md"
        );
        assert_eq!(json["content"]["kind"], "not_loaded");
    }
}
