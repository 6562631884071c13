use stocksync_core::{FailureKind, ReconcileError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("catalog pagination stalled for {marketplace}: empty page after {fetched} of {total} offers")]
    PaginationStalled {
        marketplace: String,
        fetched: usize,
        total: usize,
    },

    #[error("catalog pagination stalled for {marketplace}: page token {token:?} repeated after {fetched} offers")]
    RepeatedPageToken {
        marketplace: String,
        token: String,
        fetched: usize,
    },

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl MarketError {
    /// Classifies the error for top-level reporting.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            MarketError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            MarketError::Http(e) if e.is_connect() => FailureKind::Connection,
            _ => FailureKind::Other,
        }
    }
}
