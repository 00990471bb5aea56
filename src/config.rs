//! Explicit configuration for both subcommands.
//!
//! Every default (root directory, index repository location, forge identity,
//! timeouts) lives here and is passed down explicitly; nothing below this
//! layer reads process-global state.

use crate::{IndexError, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Marker file whose presence opts a repository into indexing.
pub const MARKER_FILE: &str = ".pip_index";

/// Per-repository manifest declaring package name and version.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Subdirectory of the index repository holding the simple-index pages.
pub const SIMPLE_DIR: &str = "simple";

/// Directory name of the index repository under the apps root.
pub const INDEX_REPO_NAME: &str = "pip-index";

/// Forge host serving the tarball archive URLs.
pub const DEFAULT_HOST: &str = "github.com";

/// Fallback forge user when a remote URL cannot be parsed.
pub const DEFAULT_USER: &str = "jakeogh";

/// Resolved settings for a scan/update run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory scanned for candidate repositories.
    pub apps_dir: PathBuf,
    /// Index repository whose `simple/` tree is rewritten.
    pub index_repo: PathBuf,
    /// Forge host serving `archive/{commit}.tar.gz` URLs.
    pub forge_host: String,
    /// Fallback forge user when the remote URL cannot be parsed.
    pub default_user: String,
    /// Bound on each git query (HEAD commit, remote URL).
    pub git_timeout: Duration,
    /// Bound on each per-repository update subprocess.
    pub update_timeout: Duration,
}

impl Settings {
    /// Build settings from the conventional home-relative locations.
    pub fn from_home() -> Result<Self> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| IndexError::Path("Failed to determine home directory".to_string()))?;
        let apps_dir = dirs.home_dir().join("_myapps");
        Ok(Self::for_apps_dir(apps_dir))
    }

    /// Build settings for an explicit apps root.
    pub fn for_apps_dir(apps_dir: impl Into<PathBuf>) -> Self {
        let apps_dir = apps_dir.into();
        let index_repo = apps_dir.join(INDEX_REPO_NAME);
        Self {
            apps_dir,
            index_repo,
            forge_host: DEFAULT_HOST.to_string(),
            default_user: DEFAULT_USER.to_string(),
            git_timeout: Duration::from_secs(5),
            update_timeout: Duration::from_secs(10),
        }
    }

    /// The `simple/` directory under the index repository.
    pub fn simple_dir(&self) -> PathBuf {
        self.index_repo.join(SIMPLE_DIR)
    }

    /// Directory name of the index repository, used to exclude it from scans.
    pub fn index_repo_name(&self) -> &str {
        self.index_repo
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(INDEX_REPO_NAME)
    }
}

/// True for directory names discovery and the root page must never treat as
/// packages (`.git` and other metadata directories).
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with('.')
}

/// True if `dir` contains the opt-in marker file.
pub fn has_marker(dir: &Path) -> bool {
    dir.join(MARKER_FILE).is_file()
}
