//! Core domain types and port definitions for fexget.
//!
//! This crate holds the pure domain model (catalog entries, resolution
//! outcomes, install receipts) and the port traits that the exchange
//! client and the installer implement. It performs no network I/O.

#![deny(unsafe_code)]

pub mod catalog;
pub mod outcome;
pub mod ports;

pub use catalog::{Catalog, CatalogEntry, CatalogError, RepoRef};
pub use outcome::{Cleanup, EntryReport, FailureReason, InstallReceipt, ResolutionOutcome};
