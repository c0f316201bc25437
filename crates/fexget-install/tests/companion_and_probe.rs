//! Bootstrap and version-probe behavior over real temp install roots.

use async_trait::async_trait;
use fexget_core::catalog::RepoRef;
use fexget_core::outcome::{InstallReceipt, InstallSource};
use fexget_core::ports::{
    ExchangeError, ExchangePort, ProbeStatus, SubmissionPage, VersionProbePort,
};
use fexget_install::{
    companion_entry, companion_installed, ensure_companion, ReceiptVersionProbe, COMPANION_NAME,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Minimal fake: one scripted version per id, one artifact per URL.
#[derive(Default)]
struct StubExchange {
    versions: HashMap<u32, Vec<String>>,
    artifacts: HashMap<String, Vec<u8>>,
    page_fetches: Mutex<u32>,
    artifact_fetches: Mutex<u32>,
}

impl StubExchange {
    fn with_version(mut self, id: u32, version: &str) -> Self {
        self.versions.insert(id, vec![version.to_string()]);
        self
    }

    fn with_artifact(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.artifacts.insert(url.to_string(), bytes);
        self
    }

    fn artifact_fetches(&self) -> u32 {
        *self.artifact_fetches.lock().unwrap()
    }
}

#[async_trait]
impl ExchangePort for StubExchange {
    async fn fetch_submission_page(&self, id: u32) -> Result<SubmissionPage, ExchangeError> {
        *self.page_fetches.lock().unwrap() += 1;
        match self.versions.get(&id) {
            Some(versions) => Ok(SubmissionPage {
                id,
                page_url: self.page_url(id),
                versions: versions.clone(),
                github: None,
            }),
            None => Err(ExchangeError::SubmissionNotFound { id }),
        }
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, ExchangeError> {
        *self.artifact_fetches.lock().unwrap() += 1;
        self.artifacts
            .get(url)
            .cloned()
            .ok_or_else(|| ExchangeError::RequestFailed {
                status: 404,
                url: url.to_string(),
            })
    }

    fn page_url(&self, id: u32) -> String {
        format!("https://exchange.test/fx/{id}")
    }

    fn archive_url(&self, id: u32, version: &str) -> String {
        format!("https://exchange.test/dl/{id}/{version}/zip")
    }

    fn zipball_url(&self, repo: &RepoRef) -> String {
        format!("https://github.test/{}/{}/zipball", repo.owner, repo.name)
    }
}

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

#[tokio::test]
async fn bootstrap_installs_companion_once() {
    let companion = companion_entry();
    let exchange = Arc::new(
        StubExchange::default()
            .with_version(companion.id, "1.3")
            .with_artifact(
                &format!("https://exchange.test/dl/{}/1.3/zip", companion.id),
                zip_bytes(&[("check_version.m", "function check_version\n")]),
            ),
    );

    let root = tempfile::tempdir().unwrap();
    assert!(!companion_installed(root.path()));

    let report = ensure_companion(exchange.clone(), root.path()).await;
    let report = report.expect("first run bootstraps");
    assert!(report.outcome.is_installed());
    assert!(companion_installed(root.path()));
    assert!(root
        .path()
        .join(COMPANION_NAME)
        .join("check_version.m")
        .exists());

    // Second run: already present, nothing fetched.
    let fetched_before = exchange.artifact_fetches();
    let report = ensure_companion(exchange.clone(), root.path()).await;
    assert!(report.is_none());
    assert_eq!(exchange.artifact_fetches(), fetched_before);
}

#[tokio::test]
async fn bootstrap_failure_reports_without_panicking() {
    // Companion id unknown upstream: the report carries the failure,
    // the caller proceeds without a probe.
    let exchange = Arc::new(StubExchange::default());
    let root = tempfile::tempdir().unwrap();

    let report = ensure_companion(exchange, root.path()).await.unwrap();
    assert!(!report.outcome.is_installed());
    assert!(!companion_installed(root.path()));
}

fn install_companion(root: &std::path::Path) {
    let dir = root.join(COMPANION_NAME);
    std::fs::create_dir_all(&dir).unwrap();
    InstallReceipt::new(
        companion_entry().id,
        COMPANION_NAME,
        Some("1.3".to_string()),
        InstallSource::VersionedArchive,
    )
    .write_to(&dir)
    .unwrap();
}

#[tokio::test]
async fn probe_unavailable_without_companion() {
    let exchange = Arc::new(StubExchange::default());
    let root = tempfile::tempdir().unwrap();

    let probe = ReceiptVersionProbe::new(exchange, root.path().to_path_buf());
    assert!(!probe.available());
}

#[tokio::test]
async fn probe_reports_up_to_date_from_receipt() {
    let exchange = Arc::new(StubExchange::default().with_version(12345, "7"));
    let root = tempfile::tempdir().unwrap();
    install_companion(root.path());

    let dir = root.path().join("widget");
    std::fs::create_dir_all(&dir).unwrap();
    InstallReceipt::new(12345, "widget", Some("7".to_string()), InstallSource::VersionedArchive)
        .write_to(&dir)
        .unwrap();

    let probe = ReceiptVersionProbe::new(exchange.clone(), root.path().to_path_buf());
    assert!(probe.available());

    let report = probe.check("widget", 12345).await;
    assert_eq!(report.status, ProbeStatus::UpToDate);
    assert_eq!(report.version_label.as_deref(), Some("7"));
    // The probe fetched the page only, never an artifact.
    assert_eq!(exchange.artifact_fetches(), 0);
}

#[tokio::test]
async fn probe_outdated_receipt_reports_unknown() {
    let exchange = Arc::new(StubExchange::default().with_version(12345, "8"));
    let root = tempfile::tempdir().unwrap();
    install_companion(root.path());

    let dir = root.path().join("widget");
    std::fs::create_dir_all(&dir).unwrap();
    InstallReceipt::new(12345, "widget", Some("7".to_string()), InstallSource::VersionedArchive)
        .write_to(&dir)
        .unwrap();

    let probe = ReceiptVersionProbe::new(exchange, root.path().to_path_buf());
    let report = probe.check("widget", 12345).await;
    assert_eq!(report.status, ProbeStatus::Unknown);
}

#[tokio::test]
async fn probe_without_receipt_reports_unknown() {
    let exchange = Arc::new(StubExchange::default().with_version(12345, "7"));
    let root = tempfile::tempdir().unwrap();
    install_companion(root.path());

    let probe = ReceiptVersionProbe::new(exchange.clone(), root.path().to_path_buf());
    let report = probe.check("widget", 12345).await;
    assert_eq!(report.status, ProbeStatus::Unknown);
    // No receipt means no page fetch either.
    assert_eq!(*exchange.page_fetches.lock().unwrap(), 0);
}

#[tokio::test]
async fn probe_page_error_reports_error() {
    // Companion present, receipt present, but the page fetch fails.
    let exchange = Arc::new(StubExchange::default());
    let root = tempfile::tempdir().unwrap();
    install_companion(root.path());

    let dir = root.path().join("widget");
    std::fs::create_dir_all(&dir).unwrap();
    InstallReceipt::new(12345, "widget", Some("7".to_string()), InstallSource::VersionedArchive)
        .write_to(&dir)
        .unwrap();

    let probe = ReceiptVersionProbe::new(exchange, root.path().to_path_buf());
    let report = probe.check("widget", 12345).await;
    assert_eq!(report.status, ProbeStatus::Error);
}
