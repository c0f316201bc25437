//! Receipt-based version probe.
//!
//! Implements the version-check collaborator on top of the install
//! receipts the acquirer writes. The capability itself is modeled as
//! an installable Exchange package (see `bootstrap`): the probe is
//! only "available" once the companion's directory carries a receipt,
//! mirroring how the checker ships as a package of its own.
//!
//! A check fetches the submission *page* only — never an artifact —
//! and compares its first version marker against the receipt.

use crate::bootstrap::companion_installed;
use async_trait::async_trait;
use fexget_core::outcome::InstallReceipt;
use fexget_core::ports::{ExchangePort, ProbeReport, ProbeStatus, VersionProbePort};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Version probe backed by install receipts and live page markers.
pub struct ReceiptVersionProbe {
    exchange: Arc<dyn ExchangePort>,
    install_root: PathBuf,
}

impl ReceiptVersionProbe {
    /// Create a probe over the given install root.
    pub fn new(exchange: Arc<dyn ExchangePort>, install_root: PathBuf) -> Self {
        Self {
            exchange,
            install_root,
        }
    }
}

#[async_trait]
impl VersionProbePort for ReceiptVersionProbe {
    fn available(&self) -> bool {
        companion_installed(&self.install_root)
    }

    async fn check(&self, name: &str, id: u32) -> ProbeReport {
        let entry_dir = self.install_root.join(name);
        let Some(receipt) = InstallReceipt::read_from(&entry_dir) else {
            debug!(name, "no install receipt; probe cannot answer");
            return ProbeReport::new(ProbeStatus::Unknown, None);
        };
        let Some(installed) = receipt.version else {
            // Installed via zipball or single-file fallback; no label
            // to compare against.
            return ProbeReport::new(ProbeStatus::Unknown, None);
        };

        let page = match self.exchange.fetch_submission_page(id).await {
            Ok(page) => page,
            Err(e) => {
                debug!(name, error = %e, "probe page fetch failed");
                return ProbeReport::new(ProbeStatus::Error, Some(installed));
            }
        };

        match page.resolved_version() {
            Some(latest) if latest == installed => {
                ProbeReport::new(ProbeStatus::UpToDate, Some(installed))
            }
            // Outdated or unlabeled upstream: fall through to a normal
            // reinstall by reporting Unknown.
            _ => ProbeReport::new(ProbeStatus::Unknown, Some(installed)),
        }
    }
}
