//! The Exchange client: page fetch + scan, artifact fetch.

use crate::config::ExchangeConfig;
use crate::http::{HttpBackend, HttpError, ReqwestBackend};
use crate::parsing::{scan_github_marker, scan_version_markers};
use crate::urls;
use async_trait::async_trait;
use fexget_core::ports::{ExchangeError, ExchangePort, SubmissionPage};
use tracing::debug;
use url::Url;

/// Exchange client generic over its HTTP backend.
pub struct ExchangeClient<B: HttpBackend> {
    config: ExchangeConfig,
    backend: B,
}

/// The production client type.
pub type DefaultExchangeClient = ExchangeClient<ReqwestBackend>;

impl DefaultExchangeClient {
    /// Create a client with the reqwest backend.
    pub fn new(config: ExchangeConfig) -> Self {
        let backend = ReqwestBackend::new(&config);
        Self { config, backend }
    }
}

impl<B: HttpBackend> ExchangeClient<B> {
    /// Create a client over an explicit backend (tests).
    pub fn with_backend(config: ExchangeConfig, backend: B) -> Self {
        Self { config, backend }
    }

    fn parse_url(raw: &str) -> Result<Url, ExchangeError> {
        Url::parse(raw).map_err(|e| ExchangeError::InvalidUrl(format!("{raw}: {e}")))
    }
}

fn map_http_error(err: HttpError) -> ExchangeError {
    match err {
        HttpError::Status { status, url } => ExchangeError::RequestFailed { status, url },
        HttpError::Transport(msg) => ExchangeError::Transport(msg),
        HttpError::InvalidUrl { url, message } => {
            ExchangeError::InvalidUrl(format!("{url}: {message}"))
        }
    }
}

#[async_trait]
impl<B: HttpBackend> ExchangePort for ExchangeClient<B> {
    async fn fetch_submission_page(&self, id: u32) -> Result<SubmissionPage, ExchangeError> {
        let page_url = urls::page_url(&self.config, id);
        let url = Self::parse_url(&page_url)?;

        let body = self.backend.get_text(&url).await.map_err(|e| {
            // A not-found page means the id does not exist upstream;
            // the installer treats that as non-retryable.
            if e.is_not_found() {
                ExchangeError::SubmissionNotFound { id }
            } else {
                map_http_error(e)
            }
        })?;

        let versions = scan_version_markers(&body, id);
        let github = scan_github_marker(&body);
        debug!(id, versions = versions.len(), github = github.is_some(), "scanned page");

        Ok(SubmissionPage {
            id,
            page_url,
            versions,
            github,
        })
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, ExchangeError> {
        let url = Self::parse_url(url)?;
        self.backend.get_bytes(&url).await.map_err(map_http_error)
    }

    fn page_url(&self, id: u32) -> String {
        urls::page_url(&self.config, id)
    }

    fn archive_url(&self, id: u32, version: &str) -> String {
        urls::archive_url(&self.config, id, version)
    }

    fn zipball_url(&self, repo: &fexget_core::catalog::RepoRef) -> String {
        urls::zipball_url(repo)
    }
}
