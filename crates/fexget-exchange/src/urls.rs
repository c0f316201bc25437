//! URL construction helpers for the Exchange and GitHub.
//!
//! Pure functions so every URL shape is unit tested in one place.

use crate::config::ExchangeConfig;
use fexget_core::catalog::RepoRef;

/// Canonical submission page URL for an id.
pub fn page_url(config: &ExchangeConfig, id: u32) -> String {
    format!("{}/{id}", config.base_url.trim_end_matches('/'))
}

/// Versioned zip archive URL for a submission.
///
/// The version component is the marker scanned off the submission
/// page, embedded verbatim.
pub fn archive_url(config: &ExchangeConfig, id: u32, version: &str) -> String {
    format!(
        "{}/submissions/{id}/versions/{version}/download/zip",
        config.downloads_base_url.trim_end_matches('/')
    )
}

/// Default-branch zipball URL for a GitHub mirror.
///
/// The API zipball endpoint serves whatever the repository's default
/// branch is, so no branch name is hardcoded.
pub fn zipball_url(repo: &RepoRef) -> String {
    format!(
        "https://api.github.com/repos/{}/{}/zipball",
        repo.owner, repo.name
    )
}
