//! HTTP backend abstraction for the Exchange client.
//!
//! Trait-based transport so the client logic can be tested against
//! canned pages. The production backend uses reqwest. Every request
//! is attempted exactly once: in this protocol "retry" means trying
//! the next resolution strategy, never re-issuing the same request.

use crate::config::ExchangeConfig;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Transport-level errors, before any submission-id interpretation.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Connection, DNS, timeout, body-read failures.
    #[error("transport error: {0}")]
    Transport(String),

    /// The URL string did not parse.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Parser message.
        message: String,
    },
}

impl HttpError {
    /// Whether this is a well-defined not-found response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Trait for HTTP backends that can fetch pages and artifacts.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch a URL as text (submission pages).
    async fn get_text(&self, url: &Url) -> Result<String, HttpError>;

    /// Fetch a URL as raw bytes (archives, single files).
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, HttpError>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a backend from the exchange configuration.
    pub fn new(config: &ExchangeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, HttpError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_text(&self, url: &Url) -> Result<String, HttpError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;

    #[tokio::test]
    async fn test_fake_backend_serves_canned_page() {
        let backend = FakeBackend::new().with_page("/12345", "<html>v7</html>");
        let url = Url::parse("https://exchange.test/fx/12345").unwrap();

        let body = backend.get_text(&url).await.unwrap();
        assert_eq!(body, "<html>v7</html>");
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_backend_404_for_unknown_url() {
        let backend = FakeBackend::new();
        let url = Url::parse("https://exchange.test/unknown").unwrap();

        let err = backend.get_text(&url).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_not_found_only_for_404() {
        let err = HttpError::Status {
            status: 404,
            url: "u".to_string(),
        };
        assert!(err.is_not_found());

        let err = HttpError::Status {
            status: 500,
            url: "u".to_string(),
        };
        assert!(!err.is_not_found());

        assert!(!HttpError::Transport("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_reqwest_backend_creation() {
        let config = ExchangeConfig::default();
        let _backend = ReqwestBackend::new(&config);
    }
}
