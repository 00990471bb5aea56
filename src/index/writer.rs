//! Read-modify-write cycle against the index repository.
//!
//! Each call opens, merges, rewrites and closes within the call; nothing is
//! held across invocations. Concurrent writers against the same index are
//! not supported (last-writer-wins on the page files).

use super::page;
use super::{PackageIndex, VersionRecord};
use crate::config::{is_reserved_name, SIMPLE_DIR};
use crate::Result;
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Merge one version record into a package's index page and regenerate the
/// root page.
///
/// Creates the package directory on first write. An absent page is an empty
/// record set, not an error. Filesystem failures are propagated.
pub async fn update(
    index_repo: &Path,
    package: &str,
    record: VersionRecord,
    host: &str,
) -> Result<()> {
    let simple_dir = index_repo.join(SIMPLE_DIR);
    let package_dir = simple_dir.join(package);

    tokio::fs::create_dir_all(&package_dir)
        .await
        .with_context(|| format!("Failed to create package directory {package_dir:?}"))?;

    let mut index = load_package_index(&package_dir, package, host).await?;
    index.upsert(record);

    let page_path = package_dir.join("index.html");
    let html = page::render_package_page(&index, host);
    tokio::fs::write(&page_path, html)
        .await
        .with_context(|| format!("Failed to write {page_path:?}"))?;

    println!("Updated {} index: {} version(s)", package, index.len());

    update_root_index(&simple_dir).await?;

    Ok(())
}

/// Load a package's current records by parsing its page, if present.
pub async fn load_package_index(
    package_dir: &Path,
    package: &str,
    host: &str,
) -> Result<PackageIndex> {
    let page_path = package_dir.join("index.html");
    if !page_path.is_file() {
        debug!("No existing page at {:?}, starting empty", page_path);
        return Ok(PackageIndex::new(package));
    }

    let content = tokio::fs::read_to_string(&page_path)
        .await
        .with_context(|| format!("Failed to read {page_path:?}"))?;
    let records = page::parse_package_page(&content, host)?;

    debug!("Loaded {} existing record(s) for {}", records.len(), package);
    Ok(PackageIndex::with_records(package, records))
}

/// Recompute the root page from the package subdirectories present on disk.
async fn update_root_index(simple_dir: &Path) -> Result<()> {
    let mut packages = Vec::new();
    let mut entries = tokio::fs::read_dir(simple_dir)
        .await
        .with_context(|| format!("Failed to read {simple_dir:?}"))?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_reserved_name(name) {
            continue;
        }
        packages.push(name.to_string());
    }

    let html = page::render_root_page(&packages);
    let root_path = simple_dir.join("index.html");
    tokio::fs::write(&root_path, html)
        .await
        .with_context(|| format!("Failed to write {root_path:?}"))?;

    println!("Updated root index: {} package(s)", packages.len());

    Ok(())
}
