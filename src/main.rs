// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and configuration, load the saved repository list
// 3. Dispatch to a subcommand handler, or start the interactive session
// 4. Exit with proper code (0 = success, 1 = user-facing failure, 2 = error)
//
// Ctrl-C cancels the session token; whatever request is in flight is
// abandoned and the program winds down normally.
// =============================================================================

mod browse;     // src/browse/ - branch -> file selection flow
mod cli;        // src/cli.rs - command-line parsing
mod config;     // src/config.rs - runtime settings
mod github;     // src/github/ - GitHub REST API client
mod logging;    // src/logging.rs - tracing setup
mod store;      // src/store/ - saved repository list
mod ui;         // src/ui/ - terminal prompts and the interactive screen
mod viewer;     // src/viewer/ - raw file preview

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use browse::{BrowseOutcome, Preselect, StepError, TreeResolver};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use github::{GithubApi, GithubClient};
use std::io::Write;
use store::{AddOutcome, RepoStore, SavedRepository, StoreError};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use ui::prompt::PromptChooser;
use viewer::{Page, ViewerError};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    logging::init(cli.global.log_level, cli.global.log_format)?;
    let config = Config::from_args(&cli.global)?;
    debug!(?config, "configuration loaded");

    let mut store = RepoStore::load(&config.store_path)
        .with_context(|| format!("cannot open store {}", config.store_path.display()))?;

    let cancel = CancellationToken::new();
    spawn_ctrl_c_watcher(cancel.clone());

    match cli.command {
        Some(Commands::Add { url }) => handle_add(&mut store, &url),
        Some(Commands::List { json }) => handle_list(&store, json),
        Some(Commands::Remove { url }) => handle_remove(&mut store, &url),
        Some(Commands::Branches { repo, json }) => {
            let client = GithubClient::new(&config.http)?;
            handle_branches(&store, &client, cancel, &repo, json).await
        }
        Some(Commands::Files { repo, branch, json }) => {
            let client = GithubClient::new(&config.http)?;
            handle_files(&store, &client, cancel, &repo, &branch, json).await
        }
        Some(Commands::Browse {
            repo,
            branch,
            file,
            url_only,
            json,
        }) => {
            let client = GithubClient::new(&config.http)?;
            let preselect = Preselect { branch, file };
            handle_browse(&store, &client, cancel, &repo, &preselect, url_only, json).await
        }
        None => {
            let client = GithubClient::new(&config.http)?;
            let input = BufReader::new(tokio::io::stdin());
            ui::Session::new(&mut store, &client, cancel, input, std::io::stdout())
                .run()
                .await?;
            Ok(EXIT_OK)
        }
    }
}

fn spawn_ctrl_c_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, cancelling");
            cancel.cancel();
        }
    });
}

fn handle_add(store: &mut RepoStore, url: &str) -> Result<i32> {
    match store.add(url) {
        Ok(AddOutcome::Added(repo)) => {
            println!("Saved {}", repo);
            Ok(EXIT_OK)
        }
        Ok(AddOutcome::AlreadySaved(repo)) => {
            debug!(url = %repo, "already saved");
            Ok(EXIT_OK)
        }
        Err(StoreError::NotGitHub(_)) => {
            eprintln!("Please enter a valid GitHub link");
            Ok(EXIT_FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_list(store: &RepoStore, json: bool) -> Result<i32> {
    let rows = ui::list::entries(&store.snapshot());
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", ui::list::render(&rows));
    }
    Ok(EXIT_OK)
}

fn handle_remove(store: &mut RepoStore, url: &str) -> Result<i32> {
    if store.remove(url)? {
        println!("Removed {}", url.trim());
        Ok(EXIT_OK)
    } else {
        eprintln!("{} is not saved", url.trim());
        Ok(EXIT_FAILURE)
    }
}

// A bad <REPO> argument is reported like any other invalid input
fn pick_or_notify(store: &RepoStore, arg: &str) -> Option<SavedRepository> {
    match ui::list::pick(store, arg) {
        Ok(repo) => Some(repo),
        Err(e) => {
            debug!(arg, error = ?e, "repository argument rejected");
            eprintln!("{}", e);
            None
        }
    }
}

// Maps a failed single fetch to the generic message and exit code
fn report_step_error(error: StepError, message: &str) -> i32 {
    match error {
        StepError::Cancelled => {
            eprintln!("Cancelled");
            EXIT_OK
        }
        StepError::Api(e) => {
            warn!(error = %e, "GitHub fetch failed");
            eprintln!("{}", message);
            EXIT_FAILURE
        }
    }
}

async fn handle_branches(
    store: &RepoStore,
    api: &dyn GithubApi,
    cancel: CancellationToken,
    repo: &str,
    json: bool,
) -> Result<i32> {
    let Some(repo) = pick_or_notify(store, repo) else {
        return Ok(EXIT_FAILURE);
    };
    let resolver = TreeResolver::new(api, cancel);

    let branches = match resolver.resolve_branches(repo.as_str()).await {
        Ok(branches) => branches,
        Err(e) => return Ok(report_step_error(e, "GitHub API access error")),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&branches)?);
    } else if branches.is_empty() {
        eprintln!("No branches found");
    } else {
        for branch in &branches {
            println!("{}", branch);
        }
    }
    Ok(EXIT_OK)
}

async fn handle_files(
    store: &RepoStore,
    api: &dyn GithubApi,
    cancel: CancellationToken,
    repo: &str,
    branch: &str,
    json: bool,
) -> Result<i32> {
    let Some(repo) = pick_or_notify(store, repo) else {
        return Ok(EXIT_FAILURE);
    };
    let resolver = TreeResolver::new(api, cancel);

    let files = match resolver.resolve_tree(repo.as_str(), branch).await {
        Ok(files) => files,
        Err(e) => return Ok(report_step_error(e, "File-scan error")),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else if files.is_empty() {
        eprintln!("No files in this branch");
    } else {
        for file in &files {
            println!("{}", file);
        }
    }
    Ok(EXIT_OK)
}

async fn handle_browse(
    store: &RepoStore,
    api: &dyn GithubApi,
    cancel: CancellationToken,
    repo: &str,
    preselect: &Preselect,
    url_only: bool,
    json: bool,
) -> Result<i32> {
    let Some(repo) = pick_or_notify(store, repo) else {
        return Ok(EXIT_FAILURE);
    };

    // Dialogs go to stderr so stdout only carries the file (or JSON)
    let mut input = BufReader::new(tokio::io::stdin());
    let mut dialogs = std::io::stderr();
    let mut chooser = PromptChooser::new(&mut input, &mut dialogs);

    let outcome = TreeResolver::new(api, cancel.clone())
        .run(repo.as_str(), preselect, &mut chooser)
        .await?;

    let context = match outcome {
        BrowseOutcome::Resolved(context) => context,
        other => {
            if let Some(notice) = other.notice() {
                eprintln!("{}", notice);
            }
            return Ok(if other.is_failure() { EXIT_FAILURE } else { EXIT_OK });
        }
    };

    let loaded = if url_only {
        Page::unloaded(context).map_err(ViewerError::Fetch)
    } else {
        eprintln!("Loading: {}", context.file_path());
        viewer::open_file(api, context, &cancel).await
    };
    let page = match loaded {
        Ok(page) => page,
        Err(ViewerError::Cancelled) => {
            eprintln!("Cancelled");
            return Ok(EXIT_OK);
        }
        Err(ViewerError::Fetch(e)) => {
            warn!(error = %e, "file download failed");
            eprintln!("Could not load the file");
            return Ok(EXIT_FAILURE);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&page)?)?;
    } else if url_only {
        writeln!(stdout, "{}", page.url)?;
    } else {
        ui::page::render(&mut stdout, &page)?;
    }
    Ok(EXIT_OK)
}
