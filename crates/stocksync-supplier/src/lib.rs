//! Supplier stock feed: download, unpack, and parse the supplier's
//! spreadsheet into [`SupplierRecord`](stocksync_core::SupplierRecord)s.

pub mod archive;
pub mod error;
pub mod feed;
pub mod sheet;

pub use archive::extract_workbook;
pub use error::FeedError;
pub use feed::{FileSupplierFeed, HttpSupplierFeed, SupplierFeed};
pub use sheet::{parse_workbook, records_from_rows, CODE_COLUMN, PRICE_COLUMN, QUANTITY_COLUMN};
