// src/browse/mod.rs
// =============================================================================
// This module resolves "which file of which branch" for a repository.
//
// Submodules:
// - flow: TreeResolver, the Chooser seam for dialogs, and the outcome types
// =============================================================================

mod flow;

pub use flow::{
    BrowseOutcome, Chooser, Dialog, NavigationContext, Preselect, StepError, TreeResolver,
};
