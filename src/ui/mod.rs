// src/ui/mod.rs
// =============================================================================
// Terminal front end.
//
// Submodules:
// - list: numbered saved-repository list and repository argument lookup
// - prompt: line prompts and the terminal Chooser for dialogs
// - page: printing a viewer page
// - session: the interactive screen tying it all together
// =============================================================================

pub mod list;
pub mod page;
pub mod prompt;
mod session;

pub use session::Session;
