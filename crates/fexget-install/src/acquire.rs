//! The per-entry resolution-and-acquisition protocol.
//!
//! Strategy order: optional version-probe short-circuit, then the
//! submission page, then the versioned archive (with the legacy
//! single-file fallback), then the GitHub zipball, then the manual
//! fallback. Each step runs only when the previous one is unavailable
//! or failed. "Retry" always means "next strategy", never re-issuing
//! the same request.

use crate::extract::{unpack_zip, ExtractError};
use fexget_core::catalog::CatalogEntry;
use fexget_core::outcome::{
    Cleanup, EntryReport, FailureReason, InstallReceipt, InstallSource, ResolutionOutcome,
};
use fexget_core::ports::{ExchangeError, ExchangePort, ProbeStatus, VersionProbePort};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the temporary download artifact inside an entry directory.
const TEMP_ARTIFACT: &str = ".fexget-download.zip";

/// Resolves and acquires one catalog entry at a time.
///
/// Holds the exchange port and, optionally, the version probe. The
/// companion self-bootstrap runs through an `Acquirer` built without
/// a probe; that bounds the bootstrap recursion to depth one.
pub struct Acquirer {
    exchange: Arc<dyn ExchangePort>,
    probe: Option<Arc<dyn VersionProbePort>>,
}

impl Acquirer {
    /// An acquirer with no version probe.
    pub fn new(exchange: Arc<dyn ExchangePort>) -> Self {
        Self {
            exchange,
            probe: None,
        }
    }

    /// Attach a version probe for short-circuit checks.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn VersionProbePort>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Resolve one entry into `dir`.
    ///
    /// Never fails: every error is folded into the report's outcome.
    /// All writes stay inside `dir`; the temporary download artifact
    /// is removed on every path, best-effort.
    pub async fn resolve_entry(&self, entry: &CatalogEntry, dir: &Path) -> EntryReport {
        let page_url = self.exchange.page_url(entry.id);

        // Step 1: probe short-circuit.
        if let Some(outcome) = self.try_probe(entry).await {
            return EntryReport {
                name: entry.name.clone(),
                page_url,
                outcome,
                cleanup: Cleanup::NotNeeded,
            };
        }

        // Step 2: submission page. A not-found id is terminal and
        // non-retryable; later strategies all depend on this page.
        let page = match self.exchange.fetch_submission_page(entry.id).await {
            Ok(page) => page,
            Err(ExchangeError::SubmissionNotFound { id }) => {
                return EntryReport {
                    name: entry.name.clone(),
                    page_url,
                    outcome: ResolutionOutcome::Failed(FailureReason::UnknownIdentifier { id }),
                    cleanup: Cleanup::NotNeeded,
                };
            }
            Err(e) => {
                return EntryReport {
                    name: entry.name.clone(),
                    page_url,
                    outcome: ResolutionOutcome::Failed(FailureReason::Network(e.to_string())),
                    cleanup: Cleanup::NotNeeded,
                };
            }
        };

        // Step 3: versioned archive, with the single-file fallback.
        if let Some(version) = page.resolved_version().map(str::to_string) {
            let (outcome, cleanup) = self.acquire_versioned(entry, dir, &version).await;
            return EntryReport {
                name: entry.name.clone(),
                page_url,
                outcome,
                cleanup,
            };
        }

        // Step 4: GitHub mirror. A catalog-level reference overrides
        // whatever the page scan found.
        let mirror = entry.github.clone().or(page.github);
        if let Some(repo) = mirror {
            let url = self.exchange.zipball_url(&repo);
            let (outcome, cleanup) = self.acquire_zipball(entry, dir, &url).await;
            return EntryReport {
                name: entry.name.clone(),
                page_url,
                outcome,
                cleanup,
            };
        }

        // Step 5: manual fallback. Nothing automated is left to try.
        EntryReport {
            name: entry.name.clone(),
            page_url,
            outcome: ResolutionOutcome::Failed(FailureReason::NoResolvableSource),
            cleanup: Cleanup::NotNeeded,
        }
    }

    /// Run the probe if one is configured and present.
    ///
    /// Returns `Some(outcome)` only for the two positive statuses;
    /// everything else falls through to the normal protocol.
    async fn try_probe(&self, entry: &CatalogEntry) -> Option<ResolutionOutcome> {
        let probe = self.probe.as_ref()?;
        if !probe.available() {
            return None;
        }

        let report = probe.check(&entry.name, entry.id).await;
        match report.status {
            ProbeStatus::UpToDate => {
                info!(name = %entry.name, "probe: already current");
                Some(ResolutionOutcome::AlreadyCurrent {
                    version: report.version_label,
                })
            }
            ProbeStatus::Downloaded => {
                info!(name = %entry.name, "probe: freshly downloaded");
                Some(match report.version_label {
                    Some(version) => ResolutionOutcome::Installed { version },
                    None => ResolutionOutcome::VersionUnknownInstalled,
                })
            }
            ProbeStatus::Unknown | ProbeStatus::Error => None,
        }
    }

    /// Fetch and unpack the versioned archive; on extraction failure,
    /// save the same bytes as a legacy single source file.
    async fn acquire_versioned(
        &self,
        entry: &CatalogEntry,
        dir: &Path,
        version: &str,
    ) -> (ResolutionOutcome, Cleanup) {
        let url = self.exchange.archive_url(entry.id, version);
        let bytes = match self.exchange.fetch_artifact(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    ResolutionOutcome::Failed(FailureReason::Network(e.to_string())),
                    Cleanup::NotNeeded,
                );
            }
        };

        let temp = dir.join(TEMP_ARTIFACT);
        if let Err(e) = std::fs::write(&temp, &bytes) {
            return (
                ResolutionOutcome::Failed(FailureReason::Network(format!(
                    "could not stage download: {e}"
                ))),
                Cleanup::NotNeeded,
            );
        }

        match unpack_zip(&temp, dir, false) {
            Ok(_) => {
                self.write_receipt(
                    entry,
                    dir,
                    Some(version.to_string()),
                    InstallSource::VersionedArchive,
                );
                (
                    ResolutionOutcome::Installed {
                        version: version.to_string(),
                    },
                    remove_temp(&temp),
                )
            }
            Err(ExtractError::NotAnArchive(_)) => {
                // Very old submissions are a lone script served without
                // an archive wrapper. Save the same bytes under the
                // entry's name; anything non-zip that is also not a
                // script comes out corrupt, a documented limitation.
                warn!(
                    name = %entry.name,
                    "artifact is not a zip; falling back to single-file install"
                );
                let script = dir.join(format!("{}.m", entry.name));
                let outcome = match std::fs::write(&script, &bytes) {
                    Ok(()) => {
                        self.write_receipt(entry, dir, None, InstallSource::SingleFile);
                        ResolutionOutcome::VersionUnknownInstalled
                    }
                    Err(_) => ResolutionOutcome::Failed(FailureReason::ExtractionFailed),
                };
                (outcome, remove_temp(&temp))
            }
            Err(_) => (
                ResolutionOutcome::Failed(FailureReason::ExtractionFailed),
                remove_temp(&temp),
            ),
        }
    }

    /// Fetch and unpack a GitHub default-branch zipball.
    async fn acquire_zipball(
        &self,
        entry: &CatalogEntry,
        dir: &Path,
        url: &str,
    ) -> (ResolutionOutcome, Cleanup) {
        let bytes = match self.exchange.fetch_artifact(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    ResolutionOutcome::Failed(FailureReason::Network(e.to_string())),
                    Cleanup::NotNeeded,
                );
            }
        };

        let temp = dir.join(TEMP_ARTIFACT);
        if let Err(e) = std::fs::write(&temp, &bytes) {
            return (
                ResolutionOutcome::Failed(FailureReason::Network(format!(
                    "could not stage download: {e}"
                ))),
                Cleanup::NotNeeded,
            );
        }

        let outcome = match unpack_zip(&temp, dir, true) {
            Ok(_) => {
                self.write_receipt(entry, dir, None, InstallSource::GithubZipball);
                ResolutionOutcome::VersionUnknownInstalled
            }
            Err(_) => ResolutionOutcome::Failed(FailureReason::ExtractionFailed),
        };
        (outcome, remove_temp(&temp))
    }

    /// Record the install receipt. Receipt failure never changes the
    /// outcome; the install itself already succeeded.
    fn write_receipt(
        &self,
        entry: &CatalogEntry,
        dir: &Path,
        version: Option<String>,
        source: InstallSource,
    ) {
        let receipt = InstallReceipt::new(entry.id, &entry.name, version, source);
        if let Err(e) = receipt.write_to(dir) {
            warn!(name = %entry.name, error = %e, "could not write install receipt");
        }
    }
}

/// Best-effort removal of the temporary artifact.
fn remove_temp(temp: &Path) -> Cleanup {
    match std::fs::remove_file(temp) {
        Ok(()) => Cleanup::Done,
        Err(e) => {
            warn!(path = %temp.display(), error = %e, "could not remove temp artifact");
            Cleanup::BestEffortFailed {
                path: PathBuf::from(temp),
            }
        }
    }
}
