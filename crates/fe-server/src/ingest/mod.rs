//! Background ingestion: fetchers, tasks, and the worker pool

pub mod dispatcher;
pub mod fetch;
pub mod tasks;

pub use dispatcher::{start, Dispatcher, WorkQueue, WorkRequest};
pub use fetch::{ArchiveFetcher, Fetch, RestFetcher};

use fe_srm::SrmError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid ingestion target: {0}")]
    InvalidTarget(String),

    #[error("ingestion queue is closed")]
    QueueClosed,

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("unexpected status {status} fetching {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive entry not found: {0}")]
    MissingEntry(String),

    #[error("malformed feed document: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error(transparent)]
    Storage(#[from] SrmError),
}
