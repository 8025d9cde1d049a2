// src/store/repos.rs
// =============================================================================
// Saved repository list, backed by one JSON document on disk.
//
// File layout (under the per-user config directory):
//   repo-peek/prefs.json
//   { "saved_repos": ["https://github.com/acme/widget", ...] }
//
// Rules:
// - A URL is trimmed and loses one trailing slash before anything else
// - It must contain "github.com" or it is rejected without touching the set
// - Duplicates (exact string equality after normalization) are a silent no-op
// - Every successful addition rewrites the whole file immediately
// - Entries read back from disk go through the same validation; ones that
//   fail are skipped with a warning
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while validating or persisting saved repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input did not contain "github.com".
    #[error("not a GitHub repository URL: {0:?}")]
    NotGitHub(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A normalized GitHub repository URL.
///
/// Only constructed through [`SavedRepository::parse`], so every value in
/// the store has already passed validation. It serializes as a plain string;
/// reading goes through [`RepoStore::load`], which validates each entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SavedRepository(String);

impl SavedRepository {
    /// Normalizes and validates user input.
    ///
    /// Example:
    ///   "  https://github.com/acme/widget/ " -> "https://github.com/acme/widget"
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        let url = input.trim();
        let url = url.strip_suffix('/').unwrap_or(url);

        if !url.contains("github.com") {
            return Err(StoreError::NotGitHub(url.to_string()));
        }

        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short name shown in lists: the last path segment of the URL.
    pub fn label(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SavedRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of [`RepoStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The URL was new and has been written to disk.
    Added(SavedRepository),
    /// The URL was already saved; nothing changed.
    AlreadySaved(SavedRepository),
}

// On-disk document. Unknown keys are ignored so older or newer files load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default)]
    saved_repos: Vec<String>,
}

/// The saved repository set plus the file it lives in.
#[derive(Debug)]
pub struct RepoStore {
    path: PathBuf,
    repos: BTreeSet<SavedRepository>,
}

impl RepoStore {
    /// Loads the store from `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let repos = match fs::read(&path) {
            Ok(bytes) => {
                let prefs: Prefs =
                    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                validated(&path, prefs.saved_repos)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no store file yet, starting empty");
                BTreeSet::new()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        debug!(path = %path.display(), count = repos.len(), "loaded saved repositories");
        Ok(Self { path, repos })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An owned copy of the saved set, in stable (sorted) order.
    pub fn snapshot(&self) -> Vec<SavedRepository> {
        self.repos.iter().cloned().collect()
    }

    /// Looks up a repository by its 1-based position in [`snapshot`](Self::snapshot).
    pub fn get(&self, position: usize) -> Option<SavedRepository> {
        position
            .checked_sub(1)
            .and_then(|i| self.repos.iter().nth(i))
            .cloned()
    }

    /// Validates, normalizes and saves `input`.
    pub fn add(&mut self, input: &str) -> Result<AddOutcome, StoreError> {
        let repo = SavedRepository::parse(input)?;

        if self.repos.contains(&repo) {
            debug!(url = %repo, "repository already saved");
            return Ok(AddOutcome::AlreadySaved(repo));
        }

        self.repos.insert(repo.clone());
        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement.
            self.repos.remove(&repo);
            return Err(e);
        }

        info!(url = %repo, "saved repository");
        Ok(AddOutcome::Added(repo))
    }

    /// Removes a saved repository. Returns false when it was not saved.
    pub fn remove(&mut self, input: &str) -> Result<bool, StoreError> {
        let Ok(repo) = SavedRepository::parse(input) else {
            return Ok(false);
        };

        if !self.repos.remove(&repo) {
            return Ok(false);
        }

        if let Err(e) = self.persist() {
            self.repos.insert(repo);
            return Err(e);
        }

        info!(url = %repo, "removed repository");
        Ok(true)
    }

    // Writes the full set through a sibling temp file and a rename.
    fn persist(&self) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let prefs = Prefs {
            saved_repos: self.repos.iter().map(|r| r.as_str().to_string()).collect(),
        };
        let json = serde_json::to_vec_pretty(&prefs)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        debug!(path = %self.path.display(), count = self.repos.len(), "store written");
        Ok(())
    }
}

// The file may have been edited by hand; normalize what we can, drop the rest
fn validated(path: &Path, raw: Vec<String>) -> BTreeSet<SavedRepository> {
    raw.into_iter()
        .filter_map(|entry| match SavedRepository::parse(&entry) {
            Ok(repo) => Some(repo),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping invalid saved entry");
                None
            }
        })
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a newtype (SavedRepository) instead of a plain String?
//    - The only constructor is parse(), so an unvalidated URL cannot end up
//      in the store by accident
//    - #[serde(transparent)] makes it serialize exactly like a String
//    - Loading reads plain strings and runs each through parse() again
//
// 2. Why BTreeSet?
//    - It is a set (no duplicates) that also iterates in sorted order,
//      so numbered lists stay stable between runs
//
// 3. Why write to a temp file and rename?
//    - rename replaces the old file in one step, so a crash mid-write
//      leaves either the old document or the new one, never half of each
// -----------------------------------------------------------------------------
