//! Terminal outcomes of per-entry resolution.
//!
//! Resolution of one catalog entry always ends in exactly one
//! `ResolutionOutcome`. Failures are ordinary outcomes here, not
//! errors: the installer converts every failure path into a
//! `Failed(reason)` report and the run moves on to the next entry.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why resolution of an entry failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The submission id does not exist on the Exchange. Non-retryable:
    /// no fallback strategy is attempted after this.
    UnknownIdentifier {
        /// The id that the Exchange reported as not found.
        id: u32,
    },
    /// The downloaded bytes were not a valid archive and the legacy
    /// single-file fallback also failed.
    ExtractionFailed,
    /// The page carried neither a version marker nor a GitHub mirror
    /// marker; there is nothing to download automatically.
    NoResolvableSource,
    /// A fetch failed for transport reasons.
    Network(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier { id } => {
                write!(f, "submission {id} not found on the Exchange")
            }
            Self::ExtractionFailed => write!(f, "downloaded artifact could not be unpacked"),
            Self::NoResolvableSource => write!(f, "no downloadable source found on the page"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
        }
    }
}

/// Terminal outcome of resolving one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The version probe reported the installed copy as current;
    /// nothing was fetched.
    AlreadyCurrent {
        /// Installed version label, when the probe reported one.
        version: Option<String>,
    },
    /// A versioned archive was fetched and unpacked.
    Installed {
        /// The resolved version embedded in the download URL.
        version: String,
    },
    /// Something was installed, but no trustworthy version label exists
    /// (GitHub zipball or legacy single-file fallback).
    VersionUnknownInstalled,
    /// Every strategy failed; manual resolution is required.
    Failed(FailureReason),
}

impl ResolutionOutcome {
    /// Whether this outcome left an installation in the entry directory.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. } | Self::VersionUnknownInstalled)
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCurrent { version: Some(v) } => write!(f, "already current (v{v})"),
            Self::AlreadyCurrent { version: None } => write!(f, "already current"),
            Self::Installed { version } => write!(f, "installed v{version}"),
            Self::VersionUnknownInstalled => write!(f, "installed (version unknown)"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Best-effort cleanup status for the temporary download artifact.
///
/// Deletion failure is deliberately ignorable: it never changes the
/// resolution outcome, but it is recorded rather than swallowed so
/// callers and tests can tell "cleaned up" from "tried and failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// No temporary artifact was created.
    NotNeeded,
    /// The temporary artifact was removed.
    Done,
    /// Removal was attempted and failed; the file may remain.
    BestEffortFailed {
        /// Path that could not be removed.
        path: PathBuf,
    },
}

/// The full per-entry report surfaced by the installer.
#[derive(Debug, Clone)]
pub struct EntryReport {
    /// Entry name (and install directory name).
    pub name: String,
    /// The submission page URL; on failure this is the pointer for
    /// manual resolution.
    pub page_url: String,
    /// Terminal outcome.
    pub outcome: ResolutionOutcome,
    /// Temp-artifact cleanup status.
    pub cleanup: Cleanup,
}

/// How an installed entry was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallSource {
    /// Versioned zip archive from the Exchange.
    VersionedArchive,
    /// Legacy single-file script saved from the archive URL.
    SingleFile,
    /// Default-branch zipball of the GitHub mirror.
    GithubZipball,
}

/// Receipt written into an entry's directory after a successful
/// install. Powers the idempotence probe on later runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReceipt {
    /// Submission id.
    pub id: u32,
    /// Entry name.
    pub name: String,
    /// Resolved version, when one was embedded in the download URL.
    pub version: Option<String>,
    /// Which strategy produced the installation.
    pub source: InstallSource,
    /// RFC 3339 timestamp of the install.
    pub installed_at: String,
}

impl InstallReceipt {
    /// File name of the receipt inside an entry directory.
    pub const FILE_NAME: &'static str = "install-info.json";

    /// Build a receipt stamped with the current time.
    pub fn new(id: u32, name: &str, version: Option<String>, source: InstallSource) -> Self {
        Self {
            id,
            name: name.to_string(),
            version,
            source,
            installed_at: Utc::now().to_rfc3339(),
        }
    }

    /// Write the receipt into `dir` as pretty-printed JSON.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(dir.join(Self::FILE_NAME), json)
    }

    /// Read a receipt from `dir`, if one exists and parses.
    pub fn read_from(dir: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(dir.join(Self::FILE_NAME)).ok()?;
        serde_json::from_str(&text).ok()
    }
}
