//! Transient records flowing through one sync run.
//!
//! None of these are persisted: they are built from the supplier feed and
//! the marketplace catalog, submitted, and dropped.

/// One row of the supplier's stock spreadsheet.
///
/// All three fields are kept as the supplier wrote them. `quantity` is either
/// an integer string, the `">10"` token, or the `"1"` reservation token;
/// `price` is a locale-formatted currency string such as `"5'990.00 руб."`.
/// Codes are not unique: duplicates pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRecord {
    pub code: String,
    pub quantity: String,
    pub price: String,
}

impl SupplierRecord {
    pub fn new(
        code: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }
}

/// Stock level to publish for one marketplace offer.
///
/// Marketplace-specific extras (warehouse id, update timestamp) are attached
/// by the integration that serializes the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub offer_id: String,
    pub quantity: u32,
}

impl StockUpdate {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Rub,
}

impl Currency {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
        }
    }
}

/// Whole-unit price to publish for one marketplace offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceUpdate {
    pub offer_id: String,
    pub price: u64,
    pub currency: Currency,
}
