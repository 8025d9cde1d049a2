// src/viewer/mod.rs
// =============================================================================
// This module shows a chosen file's raw content.
//
// Submodules:
// - raw: raw.githubusercontent.com URLs, downloading, text/binary detection
// - pane: the viewer's visible/hidden state and back navigation
// =============================================================================

mod pane;
mod raw;

pub use pane::{BackAction, Viewer};
pub use raw::{open_file, Page, PageContent, ViewerError};
