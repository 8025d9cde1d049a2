// src/ui/session.rs
// =============================================================================
// The interactive screen.
//
// Loop:
// 1. Show the saved repository list
// 2. Read a line:
//      a number     -> browse that repository (branch, file, viewer)
//      anything else-> try to save it as a GitHub URL
//      q / EOF      -> back; with no viewer open that exits
// 3. In the viewer, Enter goes back to the list
//
// Each browse gets a child of the session's CancellationToken. The token is
// cancelled when the viewer closes and when the whole session is cancelled
// (Ctrl-C), so late responses never reach the screen.
// =============================================================================

use crate::browse::{BrowseOutcome, Preselect, TreeResolver};
use crate::github::GithubApi;
use crate::store::{AddOutcome, RepoStore, StoreError};
use crate::ui::{list, page, prompt::read_line, prompt::PromptChooser};
use crate::viewer::{open_file, BackAction, Viewer, ViewerError};
use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct Session<'a, R, W> {
    store: &'a mut RepoStore,
    api: &'a dyn GithubApi,
    cancel: CancellationToken,
    input: R,
    out: W,
    viewer: Viewer,
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(
        store: &'a mut RepoStore,
        api: &'a dyn GithubApi,
        cancel: CancellationToken,
        input: R,
        out: W,
    ) -> Self {
        Self {
            store,
            api,
            cancel,
            input,
            out,
            viewer: Viewer::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!(store = %self.store.path().display(), "interactive session started");

        loop {
            let rows = list::entries(&self.store.snapshot());
            writeln!(self.out)?;
            write!(self.out, "{}", list::render(&rows))?;
            writeln!(self.out, "Enter a number to browse, a GitHub URL to add, q to quit")?;
            write!(self.out, "> ")?;
            self.out.flush()?;

            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                line = read_line(&mut self.input) => line?,
            };
            let Some(line) = line else {
                break;
            };

            match line.as_str() {
                "" => continue,
                "q" | "quit" => {
                    if self.viewer.back() == BackAction::Exit {
                        break;
                    }
                }
                _ => match line.parse::<usize>() {
                    Ok(position) => {
                        if !self.browse(position).await? {
                            break;
                        }
                    }
                    Err(_) => self.add(&line)?,
                },
            }
        }

        info!("interactive session finished");
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, ">> {}", message)?;
        Ok(())
    }

    fn add(&mut self, input: &str) -> Result<()> {
        match self.store.add(input) {
            Ok(AddOutcome::Added(repo)) => self.notify(&format!("Saved {}", repo)),
            Ok(AddOutcome::AlreadySaved(repo)) => {
                debug!(url = %repo, "already saved, nothing to do");
                Ok(())
            }
            Err(StoreError::NotGitHub(_)) => self.notify("Please enter a valid GitHub link"),
            Err(e) => Err(e.into()),
        }
    }

    // Returns false when the session should end.
    async fn browse(&mut self, position: usize) -> Result<bool> {
        let Some(repo) = self.store.get(position) else {
            self.notify(&format!("No saved repository #{}", position))?;
            return Ok(true);
        };

        let screen = self.cancel.child_token();
        let outcome = {
            let resolver = TreeResolver::new(self.api, screen.clone());
            let mut chooser = PromptChooser::new(&mut self.input, &mut self.out);
            resolver
                .run(repo.as_str(), &Preselect::default(), &mut chooser)
                .await?
        };

        if let Some(notice) = outcome.notice() {
            self.notify(&notice)?;
        }
        let BrowseOutcome::Resolved(context) = outcome else {
            return Ok(!self.cancel.is_cancelled());
        };

        self.notify(&format!("Loading: {}", context.file_path()))?;
        let page = match open_file(self.api, context, &screen).await {
            Ok(page) => page,
            Err(ViewerError::Cancelled) => return Ok(false),
            Err(ViewerError::Fetch(e)) => {
                warn!(error = %e, "file download failed");
                self.notify("Could not load the file")?;
                return Ok(true);
            }
        };

        self.viewer.show(page);
        if let Some(page) = self.viewer.page() {
            page::render(&mut self.out, page)?;
        }
        write!(self.out, "Press Enter to go back ")?;
        self.out.flush()?;

        let line = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            line = read_line(&mut self.input) => line?,
        };

        // Closing the viewer ends this screen
        self.viewer.back();
        screen.cancel();
        Ok(line.is_some())
    }
}
