//! Exchange client configuration.

use std::time::Duration;

/// Configuration for the Exchange client.
///
/// The defaults point at the real service; tests override `base_url`
/// and `downloads_base_url` to hit a fake backend instead.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Base URL for submission pages (`{base}/{id}`).
    pub base_url: String,
    /// Base URL for versioned artifact downloads.
    pub downloads_base_url: String,
    /// Per-request timeout. There is no retry; a request is attempted
    /// exactly once.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mathworks.com/matlabcentral/fileexchange".to_string(),
            downloads_base_url: "https://www.mathworks.com/matlabcentral/mlc-downloads/downloads"
                .to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("fexget/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExchangeConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert!(!config.base_url.ends_with('/'));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("fexget/"));
    }
}
