// src/logging.rs
// =============================================================================
// Logging setup.
//
// All diagnostics go through `tracing` and are written to stderr, so stdout
// only ever carries what the user asked for (lists, file contents, JSON).
//
// RUST_LOG, when set, wins over --log-level.
// =============================================================================

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plaintext,
    /// One JSON object per line
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Builds the filter: RUST_LOG if present, otherwise our crate at `level`
/// and dependencies at warn.
fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,repo_peek={}", level.as_directive()))
    })
}

/// Installs the global subscriber. Call once, early in main.
pub fn init(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = filter_for(level);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Plaintext => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).json())
            .try_init(),
    };

    installed.map_err(|e| anyhow!("failed to install logger: {}", e))
}
