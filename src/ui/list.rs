// src/ui/list.rs
// =============================================================================
// The saved repository list as the user sees it.
//
// Each row is numbered from 1 and labelled with the last path segment of
// the URL, followed by the full URL:
//
//     1. widget   https://github.com/acme/widget
//     2. gadget   https://github.com/acme/gadget
// =============================================================================

use crate::store::{RepoStore, SavedRepository};
use serde::Serialize;
use thiserror::Error;

/// Why a repository argument could not be used. The messages are shown to
/// the user as they are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error("No saved repository #{0}")]
    NoSuchPosition(usize),

    #[error("Please enter a valid GitHub link")]
    NotGitHub,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub position: usize,
    pub label: String,
    pub url: String,
}

pub fn entries(snapshot: &[SavedRepository]) -> Vec<ListEntry> {
    snapshot
        .iter()
        .enumerate()
        .map(|(i, repo)| ListEntry {
            position: i + 1,
            label: repo.label().to_string(),
            url: repo.as_str().to_string(),
        })
        .collect()
}

pub fn render(entries: &[ListEntry]) -> String {
    if entries.is_empty() {
        return "No saved repositories yet.\n".to_string();
    }

    let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{:>3}. {:<width$}   {}\n",
            entry.position,
            entry.label,
            entry.url,
            width = width
        ));
    }
    out
}

/// Turns a command-line repository argument into a repository.
///
/// A number picks from the saved list (1-based); anything else must be a
/// GitHub URL and is used as-is without being saved.
pub fn pick(store: &RepoStore, arg: &str) -> Result<SavedRepository, PickError> {
    if let Ok(position) = arg.trim().parse::<usize>() {
        return store.get(position).ok_or(PickError::NoSuchPosition(position));
    }

    SavedRepository::parse(arg).map_err(|_| PickError::NotGitHub)
}
