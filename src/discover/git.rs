//! Bounded git queries and forge-remote parsing.
//!
//! Every subprocess call is wrapped in `tokio::time::timeout`; a hung git
//! invocation costs one repository, never the whole scan.

use crate::{IndexError, Result};
use regex::Regex;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Current HEAD commit hash of a repository.
pub async fn head_commit(repo: &Path, timeout: Duration) -> Result<String> {
    run_git(repo, &["rev-parse", "HEAD"], timeout).await
}

/// URL of the `origin` remote of a repository.
pub async fn origin_url(repo: &Path, timeout: Duration) -> Result<String> {
    run_git(repo, &["remote", "get-url", "origin"], timeout).await
}

/// Extract `(user, repo)` from a forge remote URL.
///
/// Accepts both SSH (`git@host:user/repo.git`) and HTTPS
/// (`https://host/user/repo`) forms; a trailing `.git` is stripped.
pub fn parse_forge_remote(url: &str, host: &str) -> Option<(String, String)> {
    let pattern = format!(
        r"{host}[:/]([^/]+)/([^/\s]+?)(?:\.git)?$",
        host = regex::escape(host),
    );
    // The pattern is built from an escaped host; it cannot fail to compile
    // for any host string.
    let remote = Regex::new(&pattern).ok()?;
    let capture = remote.captures(url)?;
    Some((capture[1].to_string(), capture[2].to_string()))
}

async fn run_git(repo: &Path, args: &[&str], timeout: Duration) -> Result<String> {
    debug!("Running git {:?} in {:?}", args, repo);

    let result = tokio::time::timeout(
        timeout,
        tokio::process::Command::new("git")
            .args(args)
            .current_dir(repo)
            .output(),
    )
    .await
    .map_err(|_| IndexError::Timeout(format!("git {} in {}", args.join(" "), repo.display())))?;

    let output = result.map_err(|e| IndexError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(IndexError::Git(format!(
            "git {} failed in {}: {}",
            args.join(" "),
            repo.display(),
            stderr.trim(),
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
