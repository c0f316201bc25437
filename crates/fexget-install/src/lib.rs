//! Resolver/acquirer for fexget.
//!
//! Given one catalog entry and its install directory, determine the
//! best available download source, fetch it, unpack it, and report a
//! terminal outcome. Every failure path is caught and converted into
//! a `Failed(reason)` outcome; nothing here aborts the run. All
//! operations take explicit paths — there is no working-directory
//! mutation anywhere in this crate.

#![deny(unsafe_code)]

mod acquire;
mod bookmark;
mod bootstrap;
mod extract;
mod probe;

pub use acquire::Acquirer;
pub use bookmark::write_bookmark;
pub use bootstrap::{companion_entry, companion_installed, ensure_companion, COMPANION_NAME};
pub use extract::{unpack_zip, ExtractError};
pub use probe::ReceiptVersionProbe;

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
