//! CLI library for fexget: command definitions and run orchestration.

#![deny(unsafe_code)]

mod cli;
mod run;

pub use cli::{Cli, Commands};
pub use run::{install, list, InstallArgs};
