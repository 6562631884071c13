//! Yandex Market Partner API integration, one client per campaign.
//!
//! Authenticates with a bearer token. Offer mappings are paged with an
//! opaque `nextPageToken`. Stock is reported against the campaign's
//! warehouse with an `updatedAt` timestamp.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use stocksync_core::{BatchLimits, PriceUpdate, StockUpdate, YandexCampaign};

use crate::catalog::{CatalogCursor, CatalogPage, CatalogSource};
use crate::error::MarketError;
use crate::http;
use crate::marketplace::Marketplace;

const DEFAULT_BASE_URL: &str = "https://api.partner.market.yandex.ru/";

/// Offer mappings requested per page.
pub const PAGE_LIMIT: u32 = 200;

/// Yandex spells the rouble with its pre-1998 code.
const RUBLE_CURRENCY_ID: &str = "RUR";

#[derive(Debug, Deserialize)]
struct OfferMappingResponse {
    result: OfferMappingResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferMappingResult {
    #[serde(default)]
    offer_mapping_entries: Vec<OfferMappingEntry>,
    #[serde(default)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
struct OfferMappingEntry {
    offer: MappedOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappedOffer {
    shop_sku: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    skus: Vec<SkuStock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkuStock<'a> {
    sku: &'a str,
    warehouse_id: &'a str,
    items: [StockItem<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockItem<'a> {
    count: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    updated_at: &'a str,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    offers: Vec<OfferPrice<'a>>,
}

#[derive(Debug, Serialize)]
struct OfferPrice<'a> {
    id: &'a str,
    price: PriceValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceValue {
    value: u64,
    currency_id: &'static str,
}

fn sku_stock<'a>(update: &'a StockUpdate, warehouse_id: &'a str, updated_at: &'a str) -> SkuStock<'a> {
    SkuStock {
        sku: &update.offer_id,
        warehouse_id,
        items: [StockItem {
            count: update.quantity,
            kind: "FIT",
            updated_at,
        }],
    }
}

fn offer_price(update: &PriceUpdate) -> OfferPrice<'_> {
    OfferPrice {
        id: &update.offer_id,
        price: PriceValue {
            value: update.price,
            currency_id: RUBLE_CURRENCY_ID,
        },
    }
}

/// UTC timestamp in the whole-second `Z` form the stocks endpoint expects.
fn format_updated_at(updated_at: DateTime<Utc>) -> String {
    updated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Blocking client for one Yandex Market campaign.
pub struct YandexClient {
    client: Client,
    base_url: Url,
    token: String,
    campaign: YandexCampaign,
    label: String,
    limits: BatchLimits,
}

impl YandexClient {
    /// Creates a client for `campaign` against the production Partner API.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the underlying `reqwest` client
    /// cannot be constructed.
    pub fn new(
        token: &str,
        campaign: YandexCampaign,
        limits: BatchLimits,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MarketError> {
        Self::with_base_url(token, campaign, limits, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the `reqwest` client cannot be built,
    /// or [`MarketError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        campaign: YandexCampaign,
        limits: BatchLimits,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MarketError> {
        let label = format!("yandex-{}", campaign.label);
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::parse_base_url(base_url)?,
            token: token.to_owned(),
            campaign,
            label,
            limits,
        })
    }

    fn campaign_endpoint(&self, suffix: &str) -> Result<Url, MarketError> {
        http::endpoint(
            &self.base_url,
            &format!("campaigns/{}/{suffix}", self.campaign.campaign_id),
        )
    }
}

impl CatalogSource for YandexClient {
    fn label(&self) -> &str {
        &self.label
    }

    fn fetch_catalog_page(&self, cursor: Option<&str>) -> Result<CatalogPage, MarketError> {
        let mut url = self.campaign_endpoint("offer-mapping-entries")?;
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_LIMIT.to_string());
        if let Some(token) = cursor {
            url.query_pairs_mut().append_pair("page_token", token);
        }

        let request = self.client.get(url.clone()).bearer_auth(&self.token);
        let body = http::send(request, &url)?;
        let context = format!("{} offer mapping entries", self.label);
        let parsed: OfferMappingResponse = http::parse_json(&body, &context)?;

        Ok(CatalogPage {
            offer_ids: parsed
                .result
                .offer_mapping_entries
                .into_iter()
                .map(|entry| entry.offer.shop_sku)
                .collect(),
            cursor: CatalogCursor::NextPageToken(parsed.result.paging.next_page_token),
        })
    }
}

impl Marketplace for YandexClient {
    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn push_stocks(
        &self,
        batch: &[StockUpdate],
        updated_at: DateTime<Utc>,
    ) -> Result<(), MarketError> {
        let updated_at = format_updated_at(updated_at);
        let request = StocksRequest {
            skus: batch
                .iter()
                .map(|update| sku_stock(update, &self.campaign.warehouse_id, &updated_at))
                .collect(),
        };
        let url = self.campaign_endpoint("offers/stocks")?;
        let builder = self
            .client
            .put(url.clone())
            .bearer_auth(&self.token)
            .json(&request);
        http::send(builder, &url)?;
        tracing::debug!(marketplace = %self.label, records = batch.len(), "stock batch accepted");
        Ok(())
    }

    fn push_prices(&self, batch: &[PriceUpdate]) -> Result<(), MarketError> {
        let request = PricesRequest {
            offers: batch.iter().map(offer_price).collect(),
        };
        let url = self.campaign_endpoint("offer-prices/updates")?;
        let builder = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .json(&request);
        http::send(builder, &url)?;
        tracing::debug!(marketplace = %self.label, records = batch.len(), "price batch accepted");
        Ok(())
    }
}
