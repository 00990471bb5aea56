//! Subcommand implementations.
//!
//! `update` merges one version record into the index; `regen` scans the apps
//! root and invokes `update` once per repository as a subprocess, strictly
//! sequentially, so there is never more than one writer against the index.

use crate::config::{self, Settings};
use crate::discover;
use crate::index::{writer, VersionRecord};
use crate::Result;
use anyhow::Context;
use std::path::PathBuf;
use tracing::error;

/// `pip-index update`: merge one (package, version, commit) tuple into the
/// index pages and print the publish hint.
pub async fn update_command(
    package: String,
    version: String,
    commit: String,
    index_repo: Option<PathBuf>,
    github_user: Option<String>,
    github_repo: Option<String>,
) -> Result<()> {
    let index_repo = match index_repo {
        Some(path) => path,
        None => Settings::from_home()?.index_repo,
    };
    let record = VersionRecord {
        version: version.clone(),
        commit,
        forge_user: github_user.unwrap_or_else(|| config::DEFAULT_USER.to_string()),
        forge_repo: github_repo.unwrap_or_else(|| package.clone()),
    };

    writer::update(&index_repo, &package, record, config::DEFAULT_HOST).await?;

    println!("\nTo publish changes:");
    println!("  cd {}", index_repo.display());
    println!("  git add simple/");
    println!("  git commit -m 'Update {package} to {version}'");
    println!("  git push");

    Ok(())
}

/// `pip-index regen`: scan, then fan out one bounded `update` subprocess per
/// discovered repository, sorted by package name.
pub async fn regen_command(
    root: Option<PathBuf>,
    index_repo: Option<PathBuf>,
    github_user: Option<String>,
) -> Result<()> {
    let mut settings = match root {
        Some(root) => Settings::for_apps_dir(root),
        None => Settings::from_home()?,
    };
    if let Some(path) = index_repo {
        settings.index_repo = path;
    }
    if let Some(user) = github_user {
        settings.default_user = user;
    }

    println!("Apps dir: {}", settings.apps_dir.display());
    println!("Index repo: {}", settings.index_repo.display());
    println!();
    println!("Finding repositories with {} marker...", config::MARKER_FILE);

    let mut repos = discover::scan(&settings).await?;
    if repos.is_empty() {
        println!("No repositories found with {} marker", config::MARKER_FILE);
        return Ok(());
    }

    println!("\nFound {} repositories", repos.len());
    println!("\nRegenerating index...");

    // Deterministic index content regardless of directory-iteration order.
    repos.sort_by(|a, b| a.package_name.cmp(&b.package_name));

    let exe = std::env::current_exe().context("Failed to resolve own executable path")?;

    for repo in &repos {
        println!("\nAdding {} {}...", repo.package_name, repo.version);
        run_update(&exe, &settings, repo).await;
    }

    println!("\n{}", "=".repeat(60));
    println!("✓ Index regeneration complete!");
    println!("\nNext steps:");
    println!("  cd {}", settings.index_repo.display());
    println!("  git add simple/");
    println!("  git commit -m 'Regenerate index'");
    println!("  git push");

    Ok(())
}

/// Run one bounded `update` subprocess. Failures are reported and isolated:
/// a timeout or nonzero exit skips this repository only.
async fn run_update(exe: &std::path::Path, settings: &Settings, repo: &discover::RepoMetadata) {
    let result = tokio::time::timeout(
        settings.update_timeout,
        tokio::process::Command::new(exe)
            // A timed-out child must not linger as a second index writer.
            .kill_on_drop(true)
            .arg("update")
            .arg(&repo.package_name)
            .arg(&repo.version)
            .arg(&repo.commit_hash)
            .arg("--index-repo")
            .arg(&settings.index_repo)
            .arg("--github-user")
            .arg(&repo.forge_user)
            .arg("--github-repo")
            .arg(&repo.forge_repo)
            .output(),
    )
    .await;

    match result {
        Err(_) => {
            error!("Timeout adding {} (update hung)", repo.package_name);
        }
        Ok(Err(e)) => {
            error!("Failed to add {}: {}", repo.package_name, e);
        }
        Ok(Ok(output)) if output.status.success() => {
            print!("{}", String::from_utf8_lossy(&output.stdout));
        }
        Ok(Ok(output)) => {
            error!(
                "update exited with {} for {}: {}",
                output.status,
                repo.package_name,
                String::from_utf8_lossy(&output.stderr).trim(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::RepoMetadata;
    use std::time::Duration;
    use tempfile::TempDir;

    fn repo_metadata(path: &std::path::Path) -> RepoMetadata {
        RepoMetadata {
            path: path.to_path_buf(),
            package_name: "eprint".to_string(),
            version: "0.0.1".to_string(),
            commit_hash: "abc123".to_string(),
            forge_user: "jakeogh".to_string(),
            forge_repo: "eprint".to_string(),
        }
    }

    /// State letter from `/proc/{pid}/stat`, or `None` once the process is
    /// fully reaped.
    #[cfg(target_os = "linux")]
    fn process_state(pid: u32) -> Option<char> {
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        stat.rsplit_once(") ").and_then(|(_, rest)| rest.chars().next())
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timed_out_update_child_is_killed() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let pid_file = temp.path().join("child.pid");

        // Stand-in for a hung update: records its pid, then sleeps far past
        // the timeout.
        let script = temp.path().join("hung-update.sh");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho $$ > {}\nexec sleep 30\n", pid_file.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut settings = Settings::for_apps_dir(temp.path());
        settings.update_timeout = Duration::from_millis(200);
        let repo = repo_metadata(temp.path());

        run_update(&script, &settings, &repo).await;

        let pid: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();

        // The child must not survive the timeout as a second index writer.
        // Poll briefly: the kill is delivered on drop, reaping follows.
        let mut state = process_state(pid);
        for _ in 0..50 {
            match state {
                None | Some('Z') => break,
                _ => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    state = process_state(pid);
                }
            }
        }
        assert!(
            state.is_none() || state == Some('Z'),
            "timed-out update child (pid {pid}) still running in state {state:?}",
        );
    }
}
