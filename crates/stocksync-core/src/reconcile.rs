//! Joins the supplier feed with a marketplace's known offer ids.
//!
//! Both reconcilers treat the known-id list as read-only. Stock
//! reconciliation tracks which ids were already emitted in a separate set
//! and fills in the rest with zero stock afterwards.

use std::collections::HashSet;

use crate::error::ReconcileError;
use crate::normalize::normalize_price;
use crate::records::{Currency, PriceUpdate, StockUpdate, SupplierRecord};

/// Supplier token for "more than ten units".
pub const MORE_THAN_TEN: &str = ">10";

/// Stock published for [`MORE_THAN_TEN`].
pub const MORE_THAN_TEN_STOCK: u32 = 100;

/// Supplier token for a reserved item. Published as zero stock.
pub const RESERVED: &str = "1";

/// Converts a supplier quantity cell into the stock to publish.
///
/// # Errors
///
/// Returns [`ReconcileError::MalformedQuantity`] when `raw` is neither a
/// supplier token nor a non-negative integer.
pub fn parse_quantity(code: &str, raw: &str) -> Result<u32, ReconcileError> {
    match raw.trim() {
        MORE_THAN_TEN => Ok(MORE_THAN_TEN_STOCK),
        RESERVED => Ok(0),
        other => other
            .parse::<u32>()
            .map_err(|_| ReconcileError::MalformedQuantity {
                code: code.to_owned(),
                raw: raw.to_owned(),
            }),
    }
}

/// Builds one stock update for every known offer id.
///
/// Matched supplier records come first, in feed order. Known ids the feed
/// never mentioned follow with zero stock, in catalog order. Supplier codes
/// the marketplace does not list are dropped. When the feed repeats a code,
/// only its first row counts; when the catalog repeats an id, it is still
/// emitted once.
///
/// # Errors
///
/// Fails on the first matched record whose quantity cannot be parsed (see
/// [`parse_quantity`]). Unmatched records are never parsed.
pub fn reconcile_stock(
    records: &[SupplierRecord],
    known_offer_ids: &[String],
) -> Result<Vec<StockUpdate>, ReconcileError> {
    let known: HashSet<&str> = known_offer_ids.iter().map(String::as_str).collect();
    let mut emitted: HashSet<&str> = HashSet::with_capacity(known.len());
    let mut updates = Vec::with_capacity(known.len());

    for record in records {
        let code = record.code.as_str();
        if !known.contains(code) {
            continue;
        }
        if emitted.contains(code) {
            tracing::debug!(code, "repeated supplier code ignored for stock");
            continue;
        }
        let quantity = parse_quantity(code, &record.quantity)?;
        emitted.insert(code);
        updates.push(StockUpdate {
            offer_id: code.to_owned(),
            quantity,
        });
    }

    let matched = updates.len();
    for offer_id in known_offer_ids {
        if emitted.insert(offer_id.as_str()) {
            updates.push(StockUpdate {
                offer_id: offer_id.clone(),
                quantity: 0,
            });
        }
    }

    tracing::debug!(
        matched,
        zero_filled = updates.len() - matched,
        "stock reconciliation complete"
    );
    Ok(updates)
}

/// Result of [`reconcile_price`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceReconciliation {
    /// Price updates in supplier-feed order.
    pub updates: Vec<PriceUpdate>,
    /// Offer ids whose supplier price normalized to nothing usable.
    pub skipped: Vec<String>,
}

/// Builds price updates for supplier records whose code the marketplace lists.
///
/// Known ids missing from the feed get no update. Every matching row is
/// emitted, so a repeated code yields several updates and the marketplace
/// keeps the last one. A row whose price normalizes to the empty sentinel
/// (or overflows `u64`) is skipped and reported in
/// [`PriceReconciliation::skipped`].
#[must_use]
pub fn reconcile_price(
    records: &[SupplierRecord],
    known_offer_ids: &[String],
) -> PriceReconciliation {
    let known: HashSet<&str> = known_offer_ids.iter().map(String::as_str).collect();
    let mut result = PriceReconciliation::default();

    for record in records {
        if !known.contains(record.code.as_str()) {
            continue;
        }
        match normalize_price(&record.price).parse::<u64>() {
            Ok(price) => result.updates.push(PriceUpdate {
                offer_id: record.code.clone(),
                price,
                currency: Currency::Rub,
            }),
            Err(_) => {
                tracing::warn!(
                    code = %record.code,
                    raw_price = %record.price,
                    "supplier price has no digits, skipping price update"
                );
                result.skipped.push(record.code.clone());
            }
        }
    }

    result
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
