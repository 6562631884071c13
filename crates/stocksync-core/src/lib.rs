//! Domain core for the supplier → marketplace stock and price sync.
//!
//! Everything here is pure: no I/O beyond reading configuration from the
//! environment in [`config`]. Marketplace transport lives in
//! `stocksync-market`, the supplier feed in `stocksync-supplier`.

pub mod app_config;
pub mod batch;
pub mod config;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod records;

pub use app_config::{AppConfig, BatchLimits, OzonCredentials, YandexCampaign, YandexSettings};
pub use batch::partition;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, FailureKind, ReconcileError};
pub use normalize::normalize_price;
pub use reconcile::{parse_quantity, reconcile_price, reconcile_stock, PriceReconciliation};
pub use records::{Currency, PriceUpdate, StockUpdate, SupplierRecord};
