//! File Exchange web client for fexget.
//!
//! Fetches submission pages, scans them for version markers and
//! GitHub mirror markers, builds download URLs, and fetches
//! artifacts. Implements the `ExchangePort` defined in `fexget-core`;
//! the HTTP transport sits behind a trait so the client can be tested
//! against canned pages.

#![deny(unsafe_code)]

mod client;
mod config;
mod http;
mod parsing;
mod urls;

// ============================================================================
// Public API
// ============================================================================

pub use client::DefaultExchangeClient;
pub use config::ExchangeConfig;
pub use urls::{archive_url, page_url, zipball_url};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
