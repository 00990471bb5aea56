//! `pyproject.toml` metadata extraction.

use crate::config::MANIFEST_FILE;
use crate::Result;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PyProject {
    #[serde(default)]
    project: Option<ProjectTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
}

/// Read `project.name` and `project.version` from a repository's manifest.
///
/// Returns `Ok(None)` when the manifest is absent or either field is
/// missing, so callers can warn and skip the repository. A manifest that
/// exists but is not valid TOML is an error.
pub async fn read_package_info(repo: &Path) -> Result<Option<(String, String)>> {
    let manifest_path = repo.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Failed to read {manifest_path:?}"))?;
    let manifest: PyProject = toml::from_str(&content)?;

    let Some(project) = manifest.project else {
        return Ok(None);
    };
    match (project.name, project.version) {
        (Some(name), Some(version)) => Ok(Some((name, version))),
        _ => Ok(None),
    }
}
