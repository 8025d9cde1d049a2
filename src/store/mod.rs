// src/store/mod.rs
// =============================================================================
// This module persists the user's saved GitHub repository URLs.
//
// Submodules:
// - repos: the RepoStore itself plus the SavedRepository value type
//
// The store is an explicit object: callers load it, add to it, and read
// immutable snapshots. Nothing else holds the saved set.
// =============================================================================

mod repos;

pub use repos::{AddOutcome, RepoStore, SavedRepository, StoreError};
