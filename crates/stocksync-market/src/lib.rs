pub mod catalog;
pub mod error;
mod http;
pub mod marketplace;
pub mod ozon;
pub mod sync;
pub mod yandex;

pub use catalog::{list_all_offer_ids, CatalogCursor, CatalogPage, CatalogSource};
pub use error::MarketError;
pub use marketplace::Marketplace;
pub use ozon::OzonClient;
pub use sync::{sync_marketplace, PriceOutcome, StockOutcome, SyncOptions, SyncReport};
pub use yandex::YandexClient;
