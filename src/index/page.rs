//! HTML serialization of the index.
//!
//! The page format is fixed: pip consumes it directly from GitHub Pages, so
//! render and parse must round-trip the same document byte-for-byte. A link
//! is recognized by an href of the form
//! `https://{host}/{user}/{repo}/archive/{commit}.tar.gz` with an optional
//! `#egg=` fragment; the version is recovered from the link text.

use super::{PackageIndex, VersionRecord};
use crate::Result;
use regex::Regex;

/// Render a package page: one anchor per version record.
pub fn render_package_page(index: &PackageIndex, host: &str) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    <title>Links for {package}</title>\n</head>\n\
         <body>\n    <h1>Links for {package}</h1>\n",
        package = index.name
    );

    for record in index.records() {
        let tarball_url = format!(
            "https://{host}/{user}/{repo}/archive/{commit}.tar.gz",
            user = record.forge_user,
            repo = record.forge_repo,
            commit = record.commit,
        );
        let link_text = format!("{}-{}", index.name, record.version);
        html.push_str(&format!(
            "    <a href=\"{tarball_url}#egg={link_text}\">{link_text}</a><br>\n"
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Render the root page: one anchor per package, alphabetically sorted.
pub fn render_root_page(packages: &[String]) -> String {
    let mut packages: Vec<&String> = packages.iter().collect();
    packages.sort();

    let mut html = String::from(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n    <title>Simple Index</title>\n</head>\n\
         <body>\n    <h1>Simple Index</h1>\n",
    );

    for package in packages {
        html.push_str(&format!("    <a href=\"{package}/\">{package}</a><br>\n"));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Parse version records back out of a package page.
///
/// Anchors that do not match the tarball-URL shape are ignored; a page with
/// no matching anchors yields an empty set.
pub fn parse_package_page(content: &str, host: &str) -> Result<Vec<VersionRecord>> {
    let pattern = format!(
        r##"href="https://{host}/([^/]+)/([^/]+)/archive/([^"#]+)\.tar\.gz(?:#egg=[^"]*)?">([^<]+)</a>"##,
        host = regex::escape(host),
    );
    let link = Regex::new(&pattern)?;

    let mut records = Vec::new();
    for capture in link.captures_iter(content) {
        records.push(VersionRecord {
            forge_user: capture[1].to_string(),
            forge_repo: capture[2].to_string(),
            commit: capture[3].to_string(),
            version: version_from_link_text(&capture[4]).to_string(),
        });
    }

    Ok(records)
}

/// Recover the version from anchor text of the form `{package}-{version}`.
///
/// A trailing `.tar.gz` is stripped first (older pages used the tarball
/// filename as the text); if no `-` is present the whole text is the version.
fn version_from_link_text(text: &str) -> &str {
    let text = text.strip_suffix(".tar.gz").unwrap_or(text);
    match text.split_once('-') {
        Some((_, version)) => version,
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HOST: &str = "github.com";

    fn record(version: &str, commit: &str, user: &str, repo: &str) -> VersionRecord {
        VersionRecord {
            version: version.to_string(),
            commit: commit.to_string(),
            forge_user: user.to_string(),
            forge_repo: repo.to_string(),
        }
    }

    #[test]
    fn renders_expected_package_page() {
        let index = PackageIndex::with_records(
            "eprint",
            vec![record("0.0.1", "abc123", "jakeogh", "eprint")],
        );
        let html = render_package_page(&index, HOST);

        let expected = "<!DOCTYPE html>\n\
            <html>\n\
            <head>\n    <title>Links for eprint</title>\n</head>\n\
            <body>\n    <h1>Links for eprint</h1>\n    \
            <a href=\"https://github.com/jakeogh/eprint/archive/abc123.tar.gz#egg=eprint-0.0.1\">eprint-0.0.1</a><br>\n\
            </body>\n\
            </html>\n";
        assert_eq!(html, expected);
    }

    #[test]
    fn renders_expected_root_page() {
        let html = render_root_page(&["zpool".to_string(), "eprint".to_string()]);
        assert!(html.contains("<title>Simple Index</title>"));
        let eprint = html.find("<a href=\"eprint/\">eprint</a><br>").unwrap();
        let zpool = html.find("<a href=\"zpool/\">zpool</a><br>").unwrap();
        assert!(eprint < zpool, "packages must render alphabetically");
    }

    #[test]
    fn render_parse_round_trip() {
        let index = PackageIndex::with_records(
            "eprint",
            vec![
                record("0.0.1", "abc123", "jakeogh", "eprint"),
                record("0.0.2", "def456", "someoneelse", "eprint-fork"),
            ],
        );
        let html = render_package_page(&index, HOST);
        let parsed = parse_package_page(&html, HOST).unwrap();
        assert_eq!(parsed, index.records().to_vec());
    }

    #[test]
    fn parses_link_without_egg_fragment() {
        let html = r#"<a href="https://github.com/jakeogh/eprint/archive/abc123.tar.gz">eprint-0.0.1</a>"#;
        let parsed = parse_package_page(html, HOST).unwrap();
        assert_eq!(parsed, vec![record("0.0.1", "abc123", "jakeogh", "eprint")]);
    }

    #[test]
    fn parses_tarball_filename_link_text() {
        let html = r#"<a href="https://github.com/jakeogh/eprint/archive/abc123.tar.gz">eprint-0.0.1.tar.gz</a>"#;
        let parsed = parse_package_page(html, HOST).unwrap();
        assert_eq!(parsed[0].version, "0.0.1");
    }

    #[test]
    fn dashless_link_text_is_whole_version() {
        let html = r#"<a href="https://github.com/jakeogh/eprint/archive/abc123.tar.gz">0.0.1</a>"#;
        let parsed = parse_package_page(html, HOST).unwrap();
        assert_eq!(parsed[0].version, "0.0.1");
    }

    #[test]
    fn version_splits_at_first_dash_only() {
        let html = r#"<a href="https://github.com/jakeogh/my-tool/archive/abc123.tar.gz">my-tool-0.0.1</a>"#;
        let parsed = parse_package_page(html, HOST).unwrap();
        // First dash wins: the package-name prefix is "my" and the rest is
        // treated as the version.
        assert_eq!(parsed[0].version, "tool-0.0.1");
    }

    #[test]
    fn ignores_unrelated_anchors() {
        let html = concat!(
            "<a href=\"eprint/\">eprint</a><br>\n",
            "<a href=\"https://example.com/something.tar.gz\">other</a><br>\n",
            "<a href=\"https://github.com/jakeogh/eprint/archive/abc123.tar.gz#egg=eprint-0.0.1\">eprint-0.0.1</a><br>\n",
        );
        let parsed = parse_package_page(html, HOST).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].version, "0.0.1");
    }

    #[test]
    fn empty_page_parses_to_empty_set() {
        let index = PackageIndex::new("eprint");
        let html = render_package_page(&index, HOST);
        let parsed = parse_package_page(&html, HOST).unwrap();
        assert!(parsed.is_empty());
    }
}
