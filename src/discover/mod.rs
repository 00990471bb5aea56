//! Repository discovery: one pass over the apps root.
//!
//! A repository opts into indexing by carrying a `.pip_index` marker file.
//! Every per-repository failure (unreadable manifest, missing fields, no
//! resolvable commit) warns and skips that repository only; the scan itself
//! fails only if the root directory cannot be read.

pub mod git;
pub mod manifest;

use crate::config::{has_marker, is_reserved_name, Settings};
use crate::Result;
use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Everything the index writer needs for one repository. Transient: produced
/// by one scan, consumed once, not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetadata {
    pub path: PathBuf,
    pub package_name: String,
    pub version: String,
    pub commit_hash: String,
    pub forge_user: String,
    pub forge_repo: String,
}

/// Scan the apps root for marked repositories and resolve their metadata.
///
/// Returns repositories in directory-iteration order; callers that need a
/// deterministic index sort by package name before writing.
pub async fn scan(settings: &Settings) -> Result<Vec<RepoMetadata>> {
    if !settings.apps_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Apps directory does not exist: {:?}",
            settings.apps_dir
        )
        .into());
    }

    info!("Scanning for {} markers in {:?}", crate::config::MARKER_FILE, settings.apps_dir);

    let mut repos = Vec::new();
    let mut entries = tokio::fs::read_dir(&settings.apps_dir)
        .await
        .context("Failed to read apps directory")?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!("Skipping non-UTF-8 directory name: {:?}", path);
            continue;
        };
        if is_reserved_name(name) || name == settings.index_repo_name() {
            debug!("Skipping reserved directory: {}", name);
            continue;
        }

        if !has_marker(&path) {
            debug!("Skipping {}: no marker file", name);
            continue;
        }

        if let Some(metadata) = resolve_repo(settings, path, name).await {
            println!(
                "Found: {} {} ({})",
                metadata.package_name,
                metadata.version,
                short_commit(&metadata.commit_hash),
            );
            repos.push(metadata);
        }
    }

    info!("Scan complete: {} repositories discovered", repos.len());

    Ok(repos)
}

/// Resolve one marked repository's metadata, or warn and return `None`.
async fn resolve_repo(settings: &Settings, path: PathBuf, name: &str) -> Option<RepoMetadata> {
    let (package_name, version) = match manifest::read_package_info(&path).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            warn!("Skipping {}: no package name or version", name);
            return None;
        }
        Err(e) => {
            warn!("Skipping {}: could not read manifest: {}", name, e);
            return None;
        }
    };

    let commit_hash = match git::head_commit(&path, settings.git_timeout).await {
        Ok(commit) => commit,
        Err(e) => {
            warn!("Skipping {}: no resolvable commit: {}", name, e);
            return None;
        }
    };

    let (forge_user, forge_repo) = resolve_forge_identity(settings, &path, name).await;

    Some(RepoMetadata {
        path,
        package_name,
        version,
        commit_hash,
        forge_user,
        forge_repo,
    })
}

/// Forge user/repo from the origin remote, or the configured defaults.
async fn resolve_forge_identity(
    settings: &Settings,
    path: &std::path::Path,
    name: &str,
) -> (String, String) {
    match git::origin_url(path, settings.git_timeout).await {
        Ok(url) => match git::parse_forge_remote(&url, &settings.forge_host) {
            Some(identity) => identity,
            None => {
                warn!("Could not parse remote URL for {}: {}, using defaults", name, url);
                (settings.default_user.clone(), name.to_string())
            }
        },
        Err(e) => {
            warn!("Could not read remote for {}: {}, using defaults", name, e);
            (settings.default_user.clone(), name.to_string())
        }
    }
}

fn short_commit(commit: &str) -> &str {
    &commit[..commit.len().min(8)]
}
