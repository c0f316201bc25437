//! Bookmark (`.url` Internet-shortcut) files.
//!
//! One per entry, written next to the entry directories, pointing at
//! the submission page. Plain `[InternetShortcut]` format so the file
//! opens in a browser on every desktop.

use std::io;
use std::path::{Path, PathBuf};

/// Write the bookmark for an entry; returns the file path.
pub fn write_bookmark(install_root: &Path, name: &str, page_url: &str) -> io::Result<PathBuf> {
    let path = install_root.join(format!("{name} on File Exchange.url"));
    let contents = format!("[InternetShortcut]\r\nURL={page_url}\r\n");
    std::fs::write(&path, contents)?;
    Ok(path)
}
