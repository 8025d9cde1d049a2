// src/viewer/pane.rs
// =============================================================================
// Visibility of the file viewer and what "back" does.
//
//   visible + back -> hide the viewer and reset it to a blank page
//   hidden  + back -> leave the application
// =============================================================================

use crate::viewer::raw::Page;

/// What a back navigation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The viewer was closed; stay in the application
    Hidden,
    /// Nothing was open; the application should exit
    Exit,
}

#[derive(Debug, Default)]
pub struct Viewer {
    page: Option<Page>,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, page: Page) {
        self.page = Some(page);
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.page.is_some()
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn back(&mut self) -> BackAction {
        match self.page.take() {
            Some(_) => BackAction::Hidden,
            None => BackAction::Exit,
        }
    }
}
