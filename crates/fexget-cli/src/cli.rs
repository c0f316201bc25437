//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bulk installer for File Exchange packages.
#[derive(Debug, Parser)]
#[command(name = "fexget", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install every catalog entry into the destination directory.
    Install {
        /// Catalog JSON file; defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Install root; one subdirectory is created per entry.
        #[arg(long, default_value = "fex-packages")]
        dest: PathBuf,

        /// Skip entries that are already current (bootstraps the
        /// version-check companion on first use).
        #[arg(long)]
        check_updates: bool,

        /// Do not write "<name> on File Exchange.url" bookmark files.
        #[arg(long)]
        no_bookmarks: bool,
    },

    /// Print the catalog that would be installed.
    List {
        /// Catalog JSON file; defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}
