use stocksync_core::FailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("supplier archive is unreadable: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("no .xls or .xlsx file in supplier archive (members: {archive_members:?})")]
    MissingWorkbook { archive_members: Vec<String> },

    #[error("supplier workbook is unreadable: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("supplier workbook has no worksheets")]
    EmptyWorkbook,

    #[error("supplier worksheet has no \"{column}\" column")]
    MissingHeader { column: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Classifies the error for top-level reporting.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            FeedError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            FeedError::Http(e) if e.is_connect() => FailureKind::Connection,
            _ => FailureKind::Other,
        }
    }
}
