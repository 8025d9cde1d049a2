// src/browse/flow.rs
// =============================================================================
// The branch -> tree -> file selection flow.
//
// Steps (each waits for the previous one, nothing is skipped):
// 1. Fetch branch names
//      none      -> "no branches found", stop
//      exactly 1 -> use it, no dialog
//      several   -> single-choice dialog
// 2. Fetch the recursive tree of that branch, keep blobs, sort paths
//      none      -> "no files in this branch", stop
//      otherwise -> single-choice dialog with a Cancel button
// 3. Hand a complete NavigationContext to the viewer
//
// Any network or parse failure aborts the flow with a generic message.
// Nothing is retried and nothing from a failed run is kept.
//
// Every await races the session's CancellationToken, so a response that
// arrives after the user has left the screen is dropped on the floor.
// =============================================================================

use crate::github::{file_candidates, GithubApi, GithubError};
use futures::future::BoxFuture;
use serde::Serialize;
use std::future::Future;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A modal single-choice list.
#[derive(Debug, Clone, Copy)]
pub struct Dialog<'a> {
    pub title: &'a str,
    pub items: &'a [String],
    /// Label of the explicit cancel option, if the dialog has one
    pub cancel_label: Option<&'a str>,
}

/// Presents dialogs to the user.
///
/// Resolves to the chosen index, or `None` when the dialog was dismissed.
pub trait Chooser: Send {
    fn choose<'a>(&'a mut self, dialog: Dialog<'a>) -> BoxFuture<'a, io::Result<Option<usize>>>;
}

/// Repository, branch and file path of the file to open.
///
/// Only the flow builds one, and only after both choices were made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    repository_url: String,
    branch: String,
    file_path: String,
}

impl NavigationContext {
    pub(crate) fn new(repository_url: &str, branch: &str, file_path: &str) -> Self {
        Self {
            repository_url: repository_url.to_string(),
            branch: branch.to_string(),
            file_path: file_path.to_string(),
        }
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

/// Which fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Branches,
    Tree,
}

/// How a run of the flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseOutcome {
    /// Branch and file chosen; ready for the viewer
    Resolved(NavigationContext),
    NoBranches,
    NoFiles { branch: String },
    /// The user closed a dialog without choosing
    Dismissed,
    /// The session was cancelled while the flow was running
    Cancelled,
    /// A fetch failed (network, HTTP status or JSON)
    ApiError(Stage),
    /// A preselected branch is not in the branch list
    UnknownBranch(String),
    /// A preselected file is not among the branch's files
    UnknownFile { branch: String, path: String },
}

impl BrowseOutcome {
    /// The notice shown to the user, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            BrowseOutcome::Resolved(_) | BrowseOutcome::Dismissed => None,
            BrowseOutcome::NoBranches => Some("No branches found".to_string()),
            BrowseOutcome::NoFiles { .. } => Some("No files in this branch".to_string()),
            BrowseOutcome::Cancelled => Some("Cancelled".to_string()),
            BrowseOutcome::ApiError(Stage::Branches) => Some("GitHub API access error".to_string()),
            BrowseOutcome::ApiError(Stage::Tree) => Some("File-scan error".to_string()),
            BrowseOutcome::UnknownBranch(branch) => Some(format!("Branch {:?} not found", branch)),
            BrowseOutcome::UnknownFile { branch, path } => {
                Some(format!("File {:?} not found on branch {:?}", path, branch))
            }
        }
    }

    /// True for outcomes that are failures rather than normal endings.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BrowseOutcome::ApiError(_)
                | BrowseOutcome::UnknownBranch(_)
                | BrowseOutcome::UnknownFile { .. }
        )
    }
}

/// Choices made up front (CLI flags). They still have to match what
/// GitHub returns.
#[derive(Debug, Clone, Default)]
pub struct Preselect {
    pub branch: Option<String>,
    pub file: Option<String>,
}

/// Why a single fetch step did not produce data.
#[derive(Debug)]
pub enum StepError {
    Cancelled,
    Api(GithubError),
}

// Either carry on with a value or end the flow with an outcome
enum Step<T> {
    Next(T),
    Stop(BrowseOutcome),
}

/// Runs the selection flow against a [`GithubApi`].
pub struct TreeResolver<'a> {
    api: &'a dyn GithubApi,
    cancel: CancellationToken,
}

impl<'a> TreeResolver<'a> {
    pub fn new(api: &'a dyn GithubApi, cancel: CancellationToken) -> Self {
        Self { api, cancel }
    }

    /// Branch names of `repo_url`, in the order GitHub lists them.
    pub async fn resolve_branches(&self, repo_url: &str) -> Result<Vec<String>, StepError> {
        let branches = self.guard(self.api.branches(repo_url)).await?;
        debug!(repo = repo_url, count = branches.len(), "branches fetched");
        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    /// Sorted file paths (blobs only) on `branch`.
    pub async fn resolve_tree(&self, repo_url: &str, branch: &str) -> Result<Vec<String>, StepError> {
        let entries = self.guard(self.api.tree(repo_url, branch)).await?;
        let files = file_candidates(&entries);
        debug!(repo = repo_url, branch, entries = entries.len(), files = files.len(), "tree fetched");
        Ok(files)
    }

    /// Runs all steps for `repo_url`.
    ///
    /// Only I/O errors from the chooser are returned as `Err`; every other
    /// ending is a [`BrowseOutcome`].
    pub async fn run(
        &self,
        repo_url: &str,
        preselect: &Preselect,
        chooser: &mut dyn Chooser,
    ) -> io::Result<BrowseOutcome> {
        info!(repo = repo_url, "browsing repository");

        let branches = match self.resolve_branches(repo_url).await {
            Ok(branches) => branches,
            Err(e) => return Ok(self.fetch_failed(e, Stage::Branches)),
        };

        let branch = match self
            .choose_branch(&branches, preselect.branch.as_deref(), chooser)
            .await?
        {
            Step::Next(branch) => branch,
            Step::Stop(outcome) => return Ok(outcome),
        };

        let files = match self.resolve_tree(repo_url, &branch).await {
            Ok(files) => files,
            Err(e) => return Ok(self.fetch_failed(e, Stage::Tree)),
        };

        let path = match self
            .choose_file(&branch, &files, preselect.file.as_deref(), chooser)
            .await?
        {
            Step::Next(path) => path,
            Step::Stop(outcome) => return Ok(outcome),
        };

        info!(repo = repo_url, branch = %branch, path = %path, "file selected");
        Ok(BrowseOutcome::Resolved(NavigationContext::new(
            repo_url, &branch, &path,
        )))
    }

    async fn choose_branch(
        &self,
        branches: &[String],
        preselected: Option<&str>,
        chooser: &mut dyn Chooser,
    ) -> io::Result<Step<String>> {
        if branches.is_empty() {
            return Ok(Step::Stop(BrowseOutcome::NoBranches));
        }

        if let Some(wanted) = preselected {
            return Ok(match branches.iter().find(|b| b.as_str() == wanted) {
                Some(branch) => Step::Next(branch.clone()),
                None => Step::Stop(BrowseOutcome::UnknownBranch(wanted.to_string())),
            });
        }

        if let [only] = branches {
            debug!(branch = %only, "single branch, skipping dialog");
            return Ok(Step::Next(only.clone()));
        }

        let dialog = Dialog {
            title: "Choose a branch",
            items: branches,
            cancel_label: None,
        };
        Ok(match self.ask(chooser, dialog).await? {
            Step::Next(index) => Step::Next(branches[index].clone()),
            Step::Stop(outcome) => Step::Stop(outcome),
        })
    }

    async fn choose_file(
        &self,
        branch: &str,
        files: &[String],
        preselected: Option<&str>,
        chooser: &mut dyn Chooser,
    ) -> io::Result<Step<String>> {
        if files.is_empty() {
            return Ok(Step::Stop(BrowseOutcome::NoFiles {
                branch: branch.to_string(),
            }));
        }

        if let Some(wanted) = preselected {
            return Ok(match files.iter().find(|f| f.as_str() == wanted) {
                Some(path) => Step::Next(path.clone()),
                None => Step::Stop(BrowseOutcome::UnknownFile {
                    branch: branch.to_string(),
                    path: wanted.to_string(),
                }),
            });
        }

        let dialog = Dialog {
            title: "Choose a file to open",
            items: files,
            cancel_label: Some("Cancel"),
        };
        Ok(match self.ask(chooser, dialog).await? {
            Step::Next(index) => Step::Next(files[index].clone()),
            Step::Stop(outcome) => Step::Stop(outcome),
        })
    }

    // Shows a dialog; the returned index is always in range.
    async fn ask(&self, chooser: &mut dyn Chooser, dialog: Dialog<'_>) -> io::Result<Step<usize>> {
        let len = dialog.items.len();

        let picked = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Ok(Step::Stop(BrowseOutcome::Cancelled)),
            picked = chooser.choose(dialog) => picked?,
        };

        Ok(match picked {
            Some(index) if index < len => Step::Next(index),
            _ => Step::Stop(BrowseOutcome::Dismissed),
        })
    }

    async fn guard<T>(
        &self,
        fetch: impl Future<Output = Result<T, GithubError>>,
    ) -> Result<T, StepError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StepError::Cancelled),
            result = fetch => result.map_err(StepError::Api),
        }
    }

    fn fetch_failed(&self, error: StepError, stage: Stage) -> BrowseOutcome {
        match error {
            StepError::Cancelled => {
                debug!(?stage, "fetch abandoned, session cancelled");
                BrowseOutcome::Cancelled
            }
            StepError::Api(e) => {
                warn!(?stage, error = %e, "GitHub fetch failed");
                BrowseOutcome::ApiError(stage)
            }
        }
    }
}
