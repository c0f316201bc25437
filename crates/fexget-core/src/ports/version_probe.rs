//! Version probe port: the optional "is it already current?" check.
//!
//! The probe is a pluggable collaborator. The installer treats its
//! report as opaque except for the two positive statuses, which
//! short-circuit resolution; everything else falls through to the
//! normal protocol.

use async_trait::async_trait;

/// Probe verdict for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The installed copy matches the latest published version.
    UpToDate,
    /// The probe itself fetched a fresh copy.
    Downloaded,
    /// The probe could not determine anything useful.
    Unknown,
    /// The probe ran and failed.
    Error,
}

impl ProbeStatus {
    /// Whether this status ends resolution without any further work.
    pub fn short_circuits(self) -> bool {
        matches!(self, Self::UpToDate | Self::Downloaded)
    }
}

/// Status plus whatever version label the probe attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// The verdict.
    pub status: ProbeStatus,
    /// Installed version label, when the probe knows one.
    pub version_label: Option<String>,
}

impl ProbeReport {
    /// Convenience constructor.
    pub fn new(status: ProbeStatus, version_label: Option<String>) -> Self {
        Self {
            status,
            version_label,
        }
    }
}

/// Port for the optional version-check collaborator.
#[async_trait]
pub trait VersionProbePort: Send + Sync {
    /// Whether the probe capability is present locally. When false,
    /// the installer skips the probe entirely (and may bootstrap it).
    fn available(&self) -> bool;

    /// Check whether the entry `name`/`id` is already current.
    ///
    /// Never fails: a probe that cannot answer reports
    /// `ProbeStatus::Unknown` or `ProbeStatus::Error`.
    async fn check(&self, name: &str, id: u32) -> ProbeReport;
}
