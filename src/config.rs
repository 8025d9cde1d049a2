// src/config.rs
// =============================================================================
// Runtime configuration, assembled once from command-line flags.
//
// Every flag can also come from the environment (clap's `env` support):
//   REPO_PEEK_STORE       where the saved repository list lives
//   REPO_PEEK_API_BASE    GitHub REST API root (default https://api.github.com)
//   REPO_PEEK_TIMEOUT     per-request timeout in seconds (default 30)
//   REPO_PEEK_USER_AGENT  User-Agent sent with every request
//
// The default store path is <config dir>/repo-peek/prefs.json, where
// <config dir> comes from the `dirs` crate (~/.config on Linux).
// =============================================================================

use crate::cli::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Directory (under the user's config dir) that namespaces our files.
pub const STORE_NAMESPACE: &str = "repo-peek";

/// File name of the saved repository document.
pub const STORE_FILE: &str = "prefs.json";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

pub const DEFAULT_USER_AGENT: &str = concat!("repo-peek/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub api_base: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let store_path = match &args.store {
            Some(path) => path.clone(),
            None => default_store_path()?,
        };

        let api_base = Url::parse(&args.api_base)
            .with_context(|| format!("invalid --api-base {:?}", args.api_base))?;

        if args.timeout == 0 {
            return Err(anyhow!("--timeout must be at least 1 second"));
        }

        Ok(Self {
            store_path,
            http: HttpConfig {
                api_base,
                user_agent: args.user_agent.clone(),
                timeout: Duration::from_secs(args.timeout),
            },
        })
    }
}

fn default_store_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow!("no per-user config directory found; pass --store <PATH>"))?;
    Ok(base.join(STORE_NAMESPACE).join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_defaults_with_explicit_store() {
        let cli = Cli::parse_from(["repo-peek", "--store", "/tmp/peek.json", "list"]);
        let config = Config::from_args(&cli.global).unwrap();

        assert_eq!(config.store_path, PathBuf::from("/tmp/peek.json"));
        assert_eq!(config.http.api_base.as_str(), "https://api.github.com/");
        assert_eq!(config.http.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.http.user_agent.starts_with("repo-peek/"));
    }

    #[test]
    fn test_invalid_api_base() {
        let cli = Cli::parse_from([
            "repo-peek",
            "--store",
            "/tmp/peek.json",
            "--api-base",
            "not a url",
            "list",
        ]);
        assert!(Config::from_args(&cli.global).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::parse_from(["repo-peek", "--store", "/tmp/p.json", "--timeout", "0", "list"]);
        assert!(Config::from_args(&cli.global).is_err());
    }
}
