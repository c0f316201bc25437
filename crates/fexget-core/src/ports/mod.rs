//! Port definitions: the seams between the domain and its adapters.
//!
//! The installer depends on these traits only; concrete adapters
//! (the reqwest-backed exchange client, the receipt-based version
//! probe) live in their own crates and are wired together at the
//! composition root in the CLI.

mod exchange;
mod version_probe;

pub use exchange::{ExchangeError, ExchangePort, SubmissionPage};
pub use version_probe::{ProbeReport, ProbeStatus, VersionProbePort};
