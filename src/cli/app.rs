use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// pip-index: maintain a static PEP-503 pip index from local repositories
#[derive(Parser)]
#[command(name = "pip-index")]
#[command(version)]
#[command(about = "Maintain a static PEP-503 pip index from local repositories")]
#[command(
    long_about = "pip-index scans a directory of repositories for .pip_index markers and \
regenerates the simple-index HTML pages that point pip at forge tarball URLs. \
Publishing the result (git commit/push) is left to the operator."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge one package version into the index pages
    Update {
        /// Package name
        package: String,

        /// Package version
        version: String,

        /// Git commit hash the tarball URL points at
        commit: String,

        /// Path to the index repository (default: ~/_myapps/pip-index)
        #[arg(long)]
        index_repo: Option<PathBuf>,

        /// GitHub username (default: jakeogh)
        #[arg(long)]
        github_user: Option<String>,

        /// GitHub repo name (default: same as package name)
        #[arg(long)]
        github_repo: Option<String>,
    },

    /// Rescan all marked repositories and regenerate the whole index
    Regen {
        /// Root directory to scan (default: ~/_myapps)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Path to the index repository (default: {root}/pip-index)
        #[arg(long)]
        index_repo: Option<PathBuf>,

        /// Fallback GitHub username when a remote URL cannot be parsed
        #[arg(long)]
        github_user: Option<String>,
    },
}
