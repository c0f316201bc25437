//! Companion self-bootstrap.
//!
//! The version-check capability is itself an Exchange package. When a
//! run requests update checks and the companion is not installed yet,
//! it is installed through the very same resolution protocol — via an
//! `Acquirer` constructed *without* a probe, which statically bounds
//! the recursion to one level.

use crate::acquire::Acquirer;
use fexget_core::catalog::CatalogEntry;
use fexget_core::outcome::{EntryReport, InstallReceipt};
use fexget_core::ports::ExchangePort;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Name (and install directory name) of the companion package.
pub const COMPANION_NAME: &str = "exchange-version-check";

/// Submission id of the companion package.
const COMPANION_ID: u32 = 41961;

/// The well-known catalog entry for the companion package.
pub fn companion_entry() -> CatalogEntry {
    CatalogEntry::new(COMPANION_NAME, COMPANION_ID)
}

/// Whether the companion is installed under `install_root`.
///
/// Presence means a receipt, not just a directory: a half-populated
/// directory left by an interrupted run does not count.
pub fn companion_installed(install_root: &Path) -> bool {
    InstallReceipt::read_from(&install_root.join(COMPANION_NAME)).is_some()
}

/// Install the companion if it is missing.
///
/// Returns `None` when the companion is already present, otherwise
/// the report of the bootstrap install. The report can be a failure;
/// the caller then simply proceeds without update checks.
pub async fn ensure_companion(
    exchange: Arc<dyn ExchangePort>,
    install_root: &Path,
) -> Option<EntryReport> {
    if companion_installed(install_root) {
        return None;
    }

    info!("version-check companion not installed; bootstrapping it");
    let entry = companion_entry();
    let dir = install_root.join(&entry.name);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        // Surface as a normal failed report rather than an error; the
        // run continues without the probe either way.
        return Some(EntryReport {
            name: entry.name.clone(),
            page_url: exchange.page_url(entry.id),
            outcome: fexget_core::outcome::ResolutionOutcome::Failed(
                fexget_core::outcome::FailureReason::Network(format!(
                    "could not create companion directory: {e}"
                )),
            ),
            cleanup: fexget_core::outcome::Cleanup::NotNeeded,
        });
    }

    // No probe here: this is the recursion bound.
    let acquirer = Acquirer::new(exchange);
    Some(acquirer.resolve_entry(&entry, &dir).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fexget_core::outcome::InstallSource;

    #[test]
    fn test_companion_entry_is_valid() {
        let entry = companion_entry();
        assert_eq!(entry.name, COMPANION_NAME);
        assert!(entry.id > 0);
        assert!(entry.github.is_none());
    }

    #[test]
    fn test_companion_installed_requires_receipt() {
        let root = tempfile::tempdir().unwrap();
        assert!(!companion_installed(root.path()));

        // Bare directory is not enough.
        let dir = root.path().join(COMPANION_NAME);
        std::fs::create_dir_all(&dir).unwrap();
        assert!(!companion_installed(root.path()));

        let receipt = InstallReceipt::new(
            41961,
            COMPANION_NAME,
            Some("1.0".to_string()),
            InstallSource::VersionedArchive,
        );
        receipt.write_to(&dir).unwrap();
        assert!(companion_installed(root.path()));
    }
}
