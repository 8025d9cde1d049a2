// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Running `repo-peek` with no subcommand starts the interactive session.
// Subcommands cover the same steps for scripts and quick one-off use.
// =============================================================================

use crate::config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::logging::{LogFormat, LogLevel};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "repo-peek",
    version,
    about = "Save GitHub repositories, walk their branches and files, and preview raw content",
    long_about = "repo-peek keeps a list of GitHub repository URLs. Pick one, pick a branch, \
                  pick a file, and repo-peek shows the file's raw content straight from \
                  raw.githubusercontent.com. Run it without a subcommand for the interactive screen."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    // None = interactive session
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// File holding the saved repository list
    #[arg(long, global = true, env = "REPO_PEEK_STORE")]
    pub store: Option<PathBuf>,

    /// GitHub REST API root
    #[arg(long, global = true, env = "REPO_PEEK_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "REPO_PEEK_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent to GitHub (the API refuses requests without one)
    #[arg(long, global = true, env = "REPO_PEEK_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log verbosity (RUST_LOG overrides this)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plaintext)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a GitHub repository URL
    ///
    /// Example: repo-peek add https://github.com/rust-lang/rust
    Add {
        /// Repository URL; must contain "github.com"
        url: String,
    },

    /// Show saved repositories
    List {
        /// Output JSON instead of a numbered list
        #[arg(long)]
        json: bool,
    },

    /// Forget a saved repository
    Remove {
        /// Repository URL exactly as saved (a trailing slash is ignored)
        url: String,
    },

    /// List the branches of a repository
    ///
    /// Example: repo-peek branches 1
    Branches {
        /// Position in the saved list (1-based) or a GitHub URL
        repo: String,

        #[arg(long)]
        json: bool,
    },

    /// List every file on a branch, sorted
    ///
    /// Example: repo-peek files https://github.com/acme/widget --branch main
    Files {
        /// Position in the saved list (1-based) or a GitHub URL
        repo: String,

        /// Branch to scan
        #[arg(long)]
        branch: String,

        #[arg(long)]
        json: bool,
    },

    /// Pick a branch and a file, then show its raw content
    ///
    /// Branch and file are asked for interactively unless given here;
    /// given values must exist in what GitHub returns.
    Browse {
        /// Position in the saved list (1-based) or a GitHub URL
        repo: String,

        /// Use this branch instead of asking
        #[arg(long)]
        branch: Option<String>,

        /// Open this file path instead of asking
        #[arg(long)]
        file: Option<String>,

        /// Print the raw-content URL without downloading it
        #[arg(long)]
        url_only: bool,

        /// Print the resolved location (and content) as JSON
        #[arg(long)]
        json: bool,
    },
}
