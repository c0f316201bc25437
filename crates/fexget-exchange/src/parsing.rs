//! Submission page scanning.
//!
//! Version markers are download-path fragments embedded in the page
//! HTML (`…/submissions/{id}/versions/{v}/…`). The first marker wins;
//! if a page carries several *distinct* versions we keep the first and
//! warn, because the page gives no reliable ordering to pick a true
//! latest from. The GitHub mirror marker is the first `github.com`
//! repository link on the page.

use fexget_core::catalog::RepoRef;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Scan a page for version markers belonging to `id`.
///
/// Returns distinct versions in page order (first occurrence wins).
pub fn scan_version_markers(page: &str, id: u32) -> Vec<String> {
    // Versions are numeric-ish tokens: "7", "1.4", "2.0.1".
    let pattern = format!(r"submissions/{id}/versions/([0-9][0-9A-Za-z.\-]*)/");
    let re = Regex::new(&pattern).expect("version marker pattern is valid");

    let mut versions: Vec<String> = Vec::new();
    for caps in re.captures_iter(page) {
        let version = caps[1].to_string();
        if !versions.contains(&version) {
            versions.push(version);
        }
    }

    if versions.len() > 1 {
        warn!(
            id,
            first = %versions[0],
            distinct = versions.len(),
            "page carries multiple distinct version markers; using the first"
        );
    }

    versions
}

/// Find the first GitHub repository link on a page.
pub fn scan_github_marker(page: &str) -> Option<RepoRef> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"github\.com/([A-Za-z0-9_.\-]+)/([A-Za-z0-9_.\-]+)")
            .expect("github marker pattern is valid")
    });

    let caps = re.captures(page)?;
    let owner = caps[1].to_string();
    let name = caps[2].trim_end_matches(".git").to_string();
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(RepoRef::new(owner, name))
}
