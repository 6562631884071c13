//! The seam between the sync pipeline and a concrete marketplace API.

use chrono::{DateTime, Utc};
use stocksync_core::{BatchLimits, PriceUpdate, StockUpdate};

use crate::catalog::CatalogSource;
use crate::error::MarketError;

/// A marketplace integration: catalog listing plus batched stock and price
/// submission.
///
/// Implementations own the wire format (field names, extra fields such as
/// warehouse ids) and the request ceilings; the pipeline in
/// [`crate::sync`] is shared.
pub trait Marketplace: CatalogSource {
    /// Maximum records per stock and per price request.
    fn limits(&self) -> BatchLimits;

    /// Submits one stock batch. `updated_at` is the same for every batch of a
    /// run.
    ///
    /// # Errors
    ///
    /// Any non-2xx reply or transport failure. Partial-success payloads are
    /// not inspected.
    fn push_stocks(&self, batch: &[StockUpdate], updated_at: DateTime<Utc>)
        -> Result<(), MarketError>;

    /// Submits one price batch.
    ///
    /// # Errors
    ///
    /// Any non-2xx reply or transport failure.
    fn push_prices(&self, batch: &[PriceUpdate]) -> Result<(), MarketError>;
}
