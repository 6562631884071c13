//! Ozon Seller API integration.
//!
//! Authenticates with the `Client-Id` / `Api-Key` header pair. The product
//! list is paged with a `last_id` cursor and a `total` count.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use stocksync_core::{BatchLimits, OzonCredentials, PriceUpdate, StockUpdate};

use crate::catalog::{CatalogCursor, CatalogPage, CatalogSource};
use crate::error::MarketError;
use crate::http;
use crate::marketplace::Marketplace;

const DEFAULT_BASE_URL: &str = "https://api-seller.ozon.ru/";

/// Products requested per `v2/product/list` call.
pub const PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Serialize)]
struct ProductListRequest<'a> {
    filter: ProductListFilter,
    last_id: &'a str,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct ProductListFilter {
    visibility: &'static str,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListResult,
}

#[derive(Debug, Deserialize)]
struct ProductListResult {
    items: Vec<ProductListItem>,
    #[serde(default)]
    last_id: String,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct ProductListItem {
    offer_id: String,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    stocks: Vec<StockEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct StockEntry<'a> {
    offer_id: &'a str,
    stock: u32,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    prices: Vec<PriceEntry<'a>>,
}

/// Ozon takes prices as decimal strings.
#[derive(Debug, Serialize)]
struct PriceEntry<'a> {
    auto_action_enabled: &'static str,
    currency_code: &'static str,
    offer_id: &'a str,
    old_price: &'static str,
    price: String,
}

impl<'a> From<&'a StockUpdate> for StockEntry<'a> {
    fn from(update: &'a StockUpdate) -> Self {
        Self {
            offer_id: &update.offer_id,
            stock: update.quantity,
        }
    }
}

impl<'a> From<&'a PriceUpdate> for PriceEntry<'a> {
    fn from(update: &'a PriceUpdate) -> Self {
        Self {
            auto_action_enabled: "UNKNOWN",
            currency_code: update.currency.code(),
            offer_id: &update.offer_id,
            old_price: "0",
            price: update.price.to_string(),
        }
    }
}

/// Blocking client for the Ozon Seller API.
pub struct OzonClient {
    client: Client,
    base_url: Url,
    credentials: OzonCredentials,
    limits: BatchLimits,
}

impl OzonClient {
    /// Creates a client pointed at the production Ozon Seller API.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the underlying `reqwest` client
    /// cannot be constructed.
    pub fn new(
        credentials: OzonCredentials,
        limits: BatchLimits,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MarketError> {
        Self::with_base_url(credentials, limits, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the `reqwest` client cannot be built,
    /// or [`MarketError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        credentials: OzonCredentials,
        limits: BatchLimits,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MarketError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::parse_base_url(base_url)?,
            credentials,
            limits,
        })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, MarketError> {
        let url = http::endpoint(&self.base_url, path)?;
        let request = self
            .client
            .post(url.clone())
            .header("Client-Id", &self.credentials.client_id)
            .header("Api-Key", &self.credentials.seller_token)
            .json(body);
        http::send(request, &url)
    }
}

impl CatalogSource for OzonClient {
    fn label(&self) -> &str {
        "ozon"
    }

    fn fetch_catalog_page(&self, cursor: Option<&str>) -> Result<CatalogPage, MarketError> {
        let request = ProductListRequest {
            filter: ProductListFilter { visibility: "ALL" },
            last_id: cursor.unwrap_or_default(),
            limit: PAGE_LIMIT,
        };
        let body = self.post("v2/product/list", &request)?;
        let parsed: ProductListResponse = http::parse_json(&body, "ozon product list")?;

        Ok(CatalogPage {
            offer_ids: parsed
                .result
                .items
                .into_iter()
                .map(|item| item.offer_id)
                .collect(),
            cursor: CatalogCursor::LastId {
                last_id: parsed.result.last_id,
                total: parsed.result.total,
            },
        })
    }
}

impl Marketplace for OzonClient {
    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn push_stocks(
        &self,
        batch: &[StockUpdate],
        _updated_at: DateTime<Utc>,
    ) -> Result<(), MarketError> {
        let request = StocksRequest {
            stocks: batch.iter().map(StockEntry::from).collect(),
        };
        self.post("v1/product/import/stocks", &request)?;
        tracing::debug!(records = batch.len(), "ozon stock batch accepted");
        Ok(())
    }

    fn push_prices(&self, batch: &[PriceUpdate]) -> Result<(), MarketError> {
        let request = PricesRequest {
            prices: batch.iter().map(PriceEntry::from).collect(),
        };
        self.post("v1/product/import/prices", &request)?;
        tracing::debug!(records = batch.len(), "ozon price batch accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stocksync_core::Currency;

    use super::*;

    #[test]
    fn first_page_request_sends_empty_last_id() {
        let request = ProductListRequest {
            filter: ProductListFilter { visibility: "ALL" },
            last_id: "",
            limit: PAGE_LIMIT,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"filter": {"visibility": "ALL"}, "last_id": "", "limit": 1000})
        );
    }

    #[test]
    fn stock_entry_uses_ozon_field_names() {
        let update = StockUpdate {
            offer_id: "123".into(),
            quantity: 7,
        };
        assert_eq!(
            serde_json::to_value(StockEntry::from(&update)).unwrap(),
            json!({"offer_id": "123", "stock": 7})
        );
    }

    #[test]
    fn price_entry_sends_price_as_string() {
        let update = PriceUpdate {
            offer_id: "123".into(),
            price: 5990,
            currency: Currency::Rub,
        };
        assert_eq!(
            serde_json::to_value(PriceEntry::from(&update)).unwrap(),
            json!({
                "auto_action_enabled": "UNKNOWN",
                "currency_code": "RUB",
                "offer_id": "123",
                "old_price": "0",
                "price": "5990"
            })
        );
    }

    #[test]
    fn product_list_tolerates_missing_last_id() {
        let parsed: ProductListResponse = serde_json::from_value(json!({
            "result": {"items": [{"offer_id": "a", "product_id": 1}], "total": 1}
        }))
        .unwrap();
        assert_eq!(parsed.result.items[0].offer_id, "a");
        assert_eq!(parsed.result.last_id, "");
        assert_eq!(parsed.result.total, 1);
    }
}
