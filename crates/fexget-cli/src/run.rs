//! Run orchestration - the composition root.
//!
//! This is the only place where infrastructure is wired together: the
//! reqwest-backed exchange client, the receipt probe, and the
//! acquirer. Entries are processed strictly sequentially, in catalog
//! order; one entry's failure never stops the run.

use anyhow::{Context, Result};
use fexget_core::catalog::Catalog;
use fexget_core::outcome::ResolutionOutcome;
use fexget_core::ports::ExchangePort;
use fexget_exchange::{DefaultExchangeClient, ExchangeConfig};
use fexget_install::{ensure_companion, write_bookmark, Acquirer, ReceiptVersionProbe};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Options for an install run.
#[derive(Debug)]
pub struct InstallArgs {
    /// Catalog JSON file; `None` means the built-in catalog.
    pub catalog: Option<PathBuf>,
    /// Install root.
    pub dest: PathBuf,
    /// Enable the version probe (bootstrapping the companion first).
    pub check_updates: bool,
    /// Write per-entry bookmark files.
    pub bookmarks: bool,
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::from_json_file(path).context("invalid catalog file")?,
        None => Catalog::builtin(),
    };
    anyhow::ensure!(!catalog.is_empty(), "catalog is empty");
    Ok(catalog)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("spinner template is valid"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Install every catalog entry, one at a time, in catalog order.
pub async fn install(args: InstallArgs) -> Result<()> {
    // Pre-flight: a malformed catalog fails the whole run before any
    // network fetch begins.
    let catalog = load_catalog(args.catalog.as_deref())?;
    std::fs::create_dir_all(&args.dest)
        .with_context(|| format!("could not create install root {}", args.dest.display()))?;

    let exchange: Arc<dyn ExchangePort> =
        Arc::new(DefaultExchangeClient::new(ExchangeConfig::default()));

    let mut acquirer = Acquirer::new(exchange.clone());
    if args.check_updates {
        if let Some(report) = ensure_companion(exchange.clone(), &args.dest).await {
            println!("  bootstrap {}: {}", report.name, report.outcome);
        }
        if fexget_install::companion_installed(&args.dest) {
            acquirer = acquirer.with_probe(Arc::new(ReceiptVersionProbe::new(
                exchange.clone(),
                args.dest.clone(),
            )));
        } else {
            println!("  version checks unavailable; installing everything");
        }
    }

    println!("Installing {} packages into {}", catalog.len(), args.dest.display());
    println!();

    let mut installed = 0u32;
    let mut current = 0u32;
    let mut failed = 0u32;

    for entry in catalog.entries() {
        let dir = args.dest.join(&entry.name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("could not create {}", dir.display()))?;

        let pb = spinner(format!("{} (#{})", entry.name, entry.id));
        let report = acquirer.resolve_entry(entry, &dir).await;
        pb.finish_and_clear();

        if args.bookmarks {
            if let Err(e) = write_bookmark(&args.dest, &entry.name, &report.page_url) {
                warn!(name = %entry.name, error = %e, "could not write bookmark");
            }
        }

        match &report.outcome {
            ResolutionOutcome::Failed(_) => {
                failed += 1;
                println!("  ⚠ {}: {}", report.name, report.outcome);
                println!("      manual install: {}", report.page_url);
            }
            ResolutionOutcome::AlreadyCurrent { .. } => {
                current += 1;
                println!("  ✓ {}: {}", report.name, report.outcome);
            }
            _ => {
                installed += 1;
                println!("  ✓ {}: {}", report.name, report.outcome);
            }
        }
    }

    println!();
    println!("Done: {installed} installed, {current} already current, {failed} failed");
    Ok(())
}

/// Print the catalog that an install run would process.
pub fn list(catalog_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    println!("{:>8}  {:<24}  {}", "ID", "NAME", "GITHUB MIRROR");
    for entry in catalog.entries() {
        let mirror = entry
            .github
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        println!("{:>8}  {:<24}  {}", entry.id, entry.name, mirror);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog_builtin() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_load_catalog_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_catalog(Some(&path)).is_err());
    }

    #[test]
    fn test_load_catalog_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"name": "", "id": 3}]"#).unwrap();
        assert!(load_catalog(Some(&path)).is_err());
    }
}
