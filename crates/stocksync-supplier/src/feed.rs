//! Where supplier records come from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use stocksync_core::SupplierRecord;

use crate::archive::extract_workbook;
use crate::error::FeedError;
use crate::sheet::parse_workbook;

/// A source of the supplier's current stock list.
pub trait SupplierFeed {
    /// Human-readable origin for logs (URL or file path).
    fn describe(&self) -> String;

    /// Loads every record from the feed.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the feed cannot be fetched or parsed.
    fn load(&self) -> Result<Vec<SupplierRecord>, FeedError>;
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Downloads the supplier's zip archive over HTTP.
#[derive(Debug)]
pub struct HttpSupplierFeed {
    client: Client,
    url: String,
}

impl HttpSupplierFeed {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest` client cannot
    /// be constructed.
    pub fn new(url: impl Into<String>, timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn download(&self) -> Result<Vec<u8>, FeedError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(url = %self.url, status = status.as_u16(), "supplier feed download failed");
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

impl SupplierFeed for HttpSupplierFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<SupplierRecord>, FeedError> {
        let bytes = self.download()?;
        tracing::info!(url = %self.url, bytes = bytes.len(), "downloaded supplier archive");
        let (_, workbook) = extract_workbook(&bytes)?;
        parse_workbook(workbook)
    }
}

/// Reads a supplier export from disk: either the zip archive as published
/// or the workbook already extracted from it.
#[derive(Debug, Clone)]
pub struct FileSupplierFeed {
    path: PathBuf,
}

impl FileSupplierFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SupplierFeed for FileSupplierFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<SupplierRecord>, FeedError> {
        let bytes = std::fs::read(&self.path)?;
        tracing::info!(path = %self.path.display(), bytes = bytes.len(), "read supplier file");
        if has_extension(&self.path, "zip") {
            let (_, workbook) = extract_workbook(&bytes)?;
            parse_workbook(workbook)
        } else {
            parse_workbook(bytes)
        }
    }
}
