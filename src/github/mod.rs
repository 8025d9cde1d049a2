// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Submodules:
// - fetch: the HTTP client, the GithubApi trait and URL parsing
// - types: the JSON shapes of the branches and tree responses
//
// Requests are unauthenticated; there is no caching or pagination.
// =============================================================================

mod fetch;
mod types;

pub use fetch::{push_segments, repo_path, GithubApi, GithubClient, GithubError};
pub use types::file_candidates;

#[cfg(test)]
pub use types::{Branch, EntryKind, TreeEntry};
