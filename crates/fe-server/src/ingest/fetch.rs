//! Feed retrieval
//!
//! Two fetcher shapes cover both upstream feeds: [`RestFetcher`] for
//! plain documents addressed by URL, [`ArchiveFetcher`] for feeds
//! published as zip archives containing a single XML file. Both hide
//! behind [`Fetch`] so tasks can be exercised against canned bytes.

use std::io::Read;

use async_trait::async_trait;

use super::IngestError;

pub const FUEL_PRICES_URL: &str = "https://www.fueleconomy.gov/ws/rest/fuelprices";
pub const EPA_ARCHIVE_BASE_URL: &str = "https://www.fueleconomy.gov/feg/epadata";

#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieve the named resource as raw bytes.
    ///
    /// What `name` means is fetcher-specific: a full URL for
    /// [`RestFetcher`], a bare feed name (e.g. `vehicles`) for
    /// [`ArchiveFetcher`].
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, IngestError>;
}

/// Fetches a document over plain HTTP GET.
#[derive(Debug, Clone, Default)]
pub struct RestFetcher {
    client: reqwest::Client,
}

impl RestFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetch for RestFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches `{base_url}/{name}.xml.zip` and extracts `{name}.xml` from
/// the archive, entirely in memory.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ArchiveFetcher {
    pub fn new() -> Self {
        Self::with_base_url(EPA_ARCHIVE_BASE_URL)
    }

    /// Point the fetcher at an alternate archive host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for ArchiveFetcher {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, IngestError> {
        let url = format!("{}/{}.xml.zip", self.base_url, name);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }
        let body = response.bytes().await?.to_vec();

        let entry_name = format!("{}.xml", name);
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(body))?;
        let mut entry = archive.by_name(&entry_name).map_err(|err| match err {
            zip::result::ZipError::FileNotFound => IngestError::MissingEntry(entry_name),
            other => IngestError::Archive(other),
        })?;

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|err| IngestError::Archive(zip::result::ZipError::Io(err)))?;
        Ok(data)
    }
}
