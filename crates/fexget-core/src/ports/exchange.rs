//! Exchange port: fetching submission pages and download artifacts.
//!
//! The port keeps the two network operations the installer needs —
//! fetch a submission page, fetch a binary artifact — behind a trait
//! so the protocol logic can be tested against scripted fakes. The
//! error type distinguishes "the submission does not exist" from
//! generic transport failure; the installer treats the former as
//! non-retryable.

use crate::catalog::RepoRef;
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by exchange adapters.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The Exchange reported the submission id as not found.
    #[error("Submission {id} not found on the Exchange")]
    SubmissionNotFound {
        /// The id that was requested.
        id: u32,
    },

    /// A request failed with a non-success HTTP status.
    #[error("Request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Transport(String),

    /// A URL could not be constructed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// What a submission page fetch yields after scanning.
///
/// `versions` preserves page order with duplicates removed; the first
/// element is the one the installer resolves against. More than one
/// element means the page was ambiguous (the adapter warns; the
/// installer still takes the first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPage {
    /// Submission id the page belongs to.
    pub id: u32,
    /// Canonical page URL (the manual-resolution pointer on failure).
    pub page_url: String,
    /// Distinct version markers found on the page, in page order.
    pub versions: Vec<String>,
    /// GitHub mirror marker found on the page, if any.
    pub github: Option<RepoRef>,
}

impl SubmissionPage {
    /// The resolved version: first marker on the page, if any.
    pub fn resolved_version(&self) -> Option<&str> {
        self.versions.first().map(String::as_str)
    }
}

/// Port for talking to the Exchange (and artifact hosts).
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Fetch and scan the submission page for `id`.
    ///
    /// # Errors
    ///
    /// `SubmissionNotFound` when the Exchange serves a well-defined
    /// not-found response for the id; other variants for transport
    /// and HTTP failures.
    async fn fetch_submission_page(&self, id: u32) -> Result<SubmissionPage, ExchangeError>;

    /// Fetch a binary artifact (archive or single file) from `url`.
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, ExchangeError>;

    /// Canonical submission page URL for `id`, without fetching it.
    fn page_url(&self, id: u32) -> String;

    /// Versioned zip archive URL for `id` at `version`.
    fn archive_url(&self, id: u32, version: &str) -> String;

    /// Default-branch zipball URL for a GitHub mirror.
    fn zipball_url(&self, repo: &RepoRef) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_version_takes_first_marker() {
        let page = SubmissionPage {
            id: 12345,
            page_url: "https://example.org/12345".to_string(),
            versions: vec!["7".to_string(), "6".to_string()],
            github: None,
        };
        assert_eq!(page.resolved_version(), Some("7"));
    }

    #[test]
    fn test_resolved_version_empty() {
        let page = SubmissionPage {
            id: 12345,
            page_url: "https://example.org/12345".to_string(),
            versions: vec![],
            github: None,
        };
        assert_eq!(page.resolved_version(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = ExchangeError::SubmissionNotFound { id: 99999 };
        assert_eq!(err.to_string(), "Submission 99999 not found on the Exchange");

        let err = ExchangeError::RequestFailed {
            status: 503,
            url: "https://example.org/x".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }
}
