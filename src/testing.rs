// src/testing.rs
// =============================================================================
// In-process stand-ins used by the unit tests: a GitHub API that answers
// from canned data and a chooser that answers dialogs from a script.
// =============================================================================

use crate::browse::{Chooser, Dialog};
use crate::github::{Branch, EntryKind, GithubApi, GithubError, TreeEntry};
use futures::future::{self, BoxFuture, FutureExt};
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;

enum Mode {
    Normal,
    FailBranches,
    FailTree,
    Stalled,
}

pub struct FakeGithub {
    branches: Vec<String>,
    tree: Vec<TreeEntry>,
    files: HashMap<String, Vec<u8>>,
    mode: Mode,
    tree_calls: Mutex<Vec<String>>,
    raw_calls: Mutex<Vec<String>>,
}

fn forbidden(url: &str) -> GithubError {
    GithubError::Status {
        url: url.to_string(),
        status: StatusCode::FORBIDDEN,
    }
}

impl FakeGithub {
    /// `tree` entries are (path, type) pairs as GitHub would send them.
    pub fn new(branches: &[&str], tree: &[(&str, &str)]) -> Self {
        let tree = tree
            .iter()
            .map(|(path, kind)| TreeEntry {
                path: path.to_string(),
                kind: match *kind {
                    "blob" => EntryKind::Blob,
                    "tree" => EntryKind::Tree,
                    _ => EntryKind::Other,
                },
            })
            .collect();

        Self {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            tree,
            files: HashMap::new(),
            mode: Mode::Normal,
            tree_calls: Mutex::new(Vec::new()),
            raw_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_branches() -> Self {
        Self {
            mode: Mode::FailBranches,
            ..Self::new(&[], &[])
        }
    }

    pub fn failing_tree(branches: &[&str]) -> Self {
        Self {
            mode: Mode::FailTree,
            ..Self::new(branches, &[])
        }
    }

    /// Every call hangs forever.
    pub fn stalled() -> Self {
        Self {
            mode: Mode::Stalled,
            ..Self::new(&[], &[])
        }
    }

    pub fn with_file(mut self, url: &str, body: &[u8]) -> Self {
        self.files.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn tree_calls(&self) -> Vec<String> {
        self.tree_calls.lock().unwrap().clone()
    }

    pub fn raw_calls(&self) -> Vec<String> {
        self.raw_calls.lock().unwrap().clone()
    }
}

impl GithubApi for FakeGithub {
    fn branches<'a>(
        &'a self,
        repo_url: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Branch>, GithubError>> {
        match self.mode {
            Mode::Stalled => future::pending().boxed(),
            Mode::FailBranches => future::ready(Err(forbidden(repo_url))).boxed(),
            _ => {
                let branches = self
                    .branches
                    .iter()
                    .map(|name| Branch { name: name.clone() })
                    .collect();
                future::ready(Ok(branches)).boxed()
            }
        }
    }

    fn tree<'a>(
        &'a self,
        repo_url: &'a str,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TreeEntry>, GithubError>> {
        self.tree_calls.lock().unwrap().push(branch.to_string());
        match self.mode {
            Mode::Stalled => future::pending().boxed(),
            Mode::FailTree => future::ready(Err(forbidden(repo_url))).boxed(),
            _ => future::ready(Ok(self.tree.clone())).boxed(),
        }
    }

    fn raw_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GithubError>> {
        self.raw_calls.lock().unwrap().push(url.to_string());
        if let Mode::Stalled = self.mode {
            return future::pending().boxed();
        }
        let result = match self.files.get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(GithubError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            }),
        };
        future::ready(result).boxed()
    }
}

/// A shown dialog: (title, items, cancel label).
pub type ShownDialog = (String, Vec<String>, Option<String>);

/// Answers dialogs from a fixed script and records what was shown.
pub struct ScriptedChooser {
    answers: VecDeque<Option<usize>>,
    shown: Vec<ShownDialog>,
}

impl ScriptedChooser {
    pub fn new(answers: &[Option<usize>]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            shown: Vec::new(),
        }
    }

    pub fn dialogs(&self) -> Vec<ShownDialog> {
        self.shown.clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.shown.iter().map(|(title, _, _)| title.clone()).collect()
    }
}

impl Chooser for ScriptedChooser {
    fn choose<'a>(&'a mut self, dialog: Dialog<'a>) -> BoxFuture<'a, io::Result<Option<usize>>> {
        self.shown.push((
            dialog.title.to_string(),
            dialog.items.to_vec(),
            dialog.cancel_label.map(str::to_string),
        ));
        // Running out of answers behaves like dismissing the dialog
        let answer = self.answers.pop_front().flatten();
        future::ready(Ok(answer)).boxed()
    }
}
