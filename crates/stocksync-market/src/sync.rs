//! One sync run against one marketplace target:
//! list catalog → reconcile → partition → submit, strictly in sequence.

use chrono::{DateTime, Utc};
use stocksync_core::{
    partition, reconcile_price, reconcile_stock, PriceUpdate, StockUpdate, SupplierRecord,
};

use crate::catalog::list_all_offer_ids;
use crate::error::MarketError;
use crate::marketplace::Marketplace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Reconcile and partition, but submit nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockOutcome {
    /// Every record built for submission, zero stock included.
    pub records: Vec<StockUpdate>,
    /// The subset of `records` with stock above zero. Informational only.
    pub not_empty: Vec<StockUpdate>,
    pub batches: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceOutcome {
    pub records: Vec<PriceUpdate>,
    /// Offer ids left without a price update because the supplier price had
    /// no digits.
    pub skipped: Vec<String>,
    pub batches: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub target: String,
    pub offers_known: usize,
    pub stock: StockOutcome,
    pub price: PriceOutcome,
    pub dry_run: bool,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} offers, {} stock updates ({} in stock) in {} batches, {} price updates in {} batches",
            self.target,
            self.offers_known,
            self.stock.records.len(),
            self.stock.not_empty.len(),
            self.stock.batches,
            self.price.records.len(),
            self.price.batches,
        )?;
        if !self.price.skipped.is_empty() {
            write!(f, ", {} prices skipped", self.price.skipped.len())?;
        }
        if self.dry_run {
            write!(f, " [dry run]")?;
        }
        Ok(())
    }
}

/// Runs a full stock and price sync for one marketplace target.
///
/// The catalog is listed once and shared by both passes. Stock goes first.
/// Batches are sent one at a time in order; a failed batch aborts the run and
/// earlier batches stay applied.
///
/// # Errors
///
/// Catalog listing, reconciliation and submission failures are returned as
/// they occur.
pub fn sync_marketplace<M>(
    market: &M,
    supplier: &[SupplierRecord],
    options: SyncOptions,
) -> Result<SyncReport, MarketError>
where
    M: Marketplace + ?Sized,
{
    let offer_ids = list_all_offer_ids(market)?;
    let updated_at = Utc::now();

    let stock = sync_stocks(market, supplier, &offer_ids, updated_at, options)?;
    let price = sync_prices(market, supplier, &offer_ids, options)?;

    let report = SyncReport {
        target: market.label().to_owned(),
        offers_known: offer_ids.len(),
        stock,
        price,
        dry_run: options.dry_run,
    };
    tracing::info!(
        marketplace = %report.target,
        offers = report.offers_known,
        stock_records = report.stock.records.len(),
        in_stock = report.stock.not_empty.len(),
        price_records = report.price.records.len(),
        prices_skipped = report.price.skipped.len(),
        dry_run = options.dry_run,
        "marketplace sync complete"
    );
    Ok(report)
}

/// Reconciles stock against `offer_ids` and submits it in batches.
///
/// # Errors
///
/// [`MarketError::Reconcile`] on a malformed supplier quantity, otherwise
/// the first failed submission.
pub fn sync_stocks<M>(
    market: &M,
    supplier: &[SupplierRecord],
    offer_ids: &[String],
    updated_at: DateTime<Utc>,
    options: SyncOptions,
) -> Result<StockOutcome, MarketError>
where
    M: Marketplace + ?Sized,
{
    let records = reconcile_stock(supplier, offer_ids)?;
    let mut batches = 0usize;

    for batch in partition(&records, market.limits().stock) {
        batches += 1;
        if options.dry_run {
            continue;
        }
        market.push_stocks(batch, updated_at)?;
        tracing::debug!(
            marketplace = market.label(),
            batch = batches,
            records = batch.len(),
            "stock batch submitted"
        );
    }

    let not_empty = records.iter().filter(|r| r.in_stock()).cloned().collect();
    Ok(StockOutcome {
        records,
        not_empty,
        batches,
    })
}

/// Reconciles prices against `offer_ids` and submits them in batches.
///
/// # Errors
///
/// The first failed submission.
pub fn sync_prices<M>(
    market: &M,
    supplier: &[SupplierRecord],
    offer_ids: &[String],
    options: SyncOptions,
) -> Result<PriceOutcome, MarketError>
where
    M: Marketplace + ?Sized,
{
    let reconciled = reconcile_price(supplier, offer_ids);
    let mut batches = 0usize;

    for batch in partition(&reconciled.updates, market.limits().price) {
        batches += 1;
        if options.dry_run {
            continue;
        }
        market.push_prices(batch)?;
        tracing::debug!(
            marketplace = market.label(),
            batch = batches,
            records = batch.len(),
            "price batch submitted"
        );
    }

    Ok(PriceOutcome {
        records: reconciled.updates,
        skipped: reconciled.skipped,
        batches,
    })
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
