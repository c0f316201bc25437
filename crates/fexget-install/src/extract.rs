//! Zip extraction into an entry's install directory.
//!
//! GitHub zipballs wrap everything in a `{owner}-{repo}-{sha}/`
//! prefix directory; `strip_top_level` flattens that away so the
//! entry directory holds the package contents directly, matching what
//! an Exchange archive produces.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while unpacking an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not a readable zip archive.
    #[error("not a valid zip archive: {0}")]
    NotAnArchive(String),

    /// An archive entry would escape the destination directory.
    #[error("archive entry has an unsafe path: {name}")]
    UnsafePath {
        /// The offending entry name.
        name: String,
    },

    /// Filesystem failure while writing extracted files.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] io::Error),
}

/// Unpack the zip at `archive_path` into `dest`.
///
/// Returns the number of files written. Directory entries are
/// skipped; missing parent directories are created as needed.
pub fn unpack_zip(
    archive_path: &Path,
    dest: &Path,
    strip_top_level: bool,
) -> Result<usize, ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::NotAnArchive(e.to_string()))?;

    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::NotAnArchive(e.to_string()))?;

        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let safe = entry.enclosed_name().ok_or(ExtractError::UnsafePath {
            name: name.clone(),
        })?;

        let relative = if strip_top_level {
            match strip_first_component(&safe) {
                Some(p) => p,
                // Top-level file in a zipball wrapper; nothing useful.
                None => continue,
            }
        } else {
            safe
        };

        let dest_path = dest.join(&relative);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&dest_path)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    debug!(files = written, dest = %dest.display(), "unpacked archive");
    Ok(written)
}

/// Drop the first path component; `None` if nothing remains.
fn strip_first_component(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest: PathBuf = components
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest)
    }
}
