use std::num::{NonZeroU64, NonZeroUsize};

use crate::app_config::{AppConfig, BatchLimits, OzonCredentials, YandexCampaign, YandexSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Blank values are treated the same as unset ones.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    // Both variables of a pair must be set together.
    let pair = |first: &str, second: &str| -> Result<Option<(String, String)>, ConfigError> {
        match (optional(first), optional(second)) {
            (Some(a), Some(b)) => Ok(Some((a, b))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(second.to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(first.to_string())),
        }
    };

    // A zero timeout would fail every request immediately.
    let parse_timeout = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<NonZeroU64>()
            .map(NonZeroU64::get)
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_batch = |var: &str, default: &str| -> Result<NonZeroUsize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<NonZeroUsize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let ozon = pair("OZON_CLIENT_ID", "OZON_SELLER_TOKEN")?.map(|(client_id, seller_token)| {
        OzonCredentials {
            client_id,
            seller_token,
        }
    });

    let mut campaigns = Vec::new();
    for label in ["fbs", "dbs"] {
        let upper = label.to_uppercase();
        let campaign_var = format!("YANDEX_{upper}_CAMPAIGN_ID");
        let warehouse_var = format!("YANDEX_{upper}_WAREHOUSE_ID");
        if let Some((campaign_id, warehouse_id)) = pair(&campaign_var, &warehouse_var)? {
            campaigns.push(YandexCampaign {
                label: label.to_string(),
                campaign_id,
                warehouse_id,
            });
        }
    }

    let yandex = match (optional("YANDEX_MARKET_TOKEN"), campaigns.is_empty()) {
        (Some(token), false) => Some(YandexSettings { token, campaigns }),
        (None, true) => None,
        (None, false) => {
            return Err(ConfigError::MissingEnvVar("YANDEX_MARKET_TOKEN".to_string()));
        }
        (Some(_), true) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "YANDEX_MARKET_TOKEN".to_string(),
                reason: "set, but no YANDEX_FBS_* or YANDEX_DBS_* campaign is configured"
                    .to_string(),
            });
        }
    };

    if ozon.is_none() && yandex.is_none() {
        return Err(ConfigError::NoMarketplace);
    }

    let supplier_feed_url = or_default(
        "STOCKSYNC_SUPPLIER_FEED_URL",
        "https://timeworld.ru/upload/files/ostatki.zip",
    );
    let log_level = or_default("STOCKSYNC_LOG_LEVEL", "info");
    let request_timeout_secs = parse_timeout("STOCKSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("STOCKSYNC_USER_AGENT", "stocksync/0.1 (inventory-sync)");

    let ozon_limits = BatchLimits {
        stock: parse_batch("STOCKSYNC_OZON_STOCK_BATCH", "100")?,
        price: parse_batch("STOCKSYNC_OZON_PRICE_BATCH", "900")?,
    };
    let yandex_limits = BatchLimits {
        stock: parse_batch("STOCKSYNC_YANDEX_STOCK_BATCH", "2000")?,
        price: parse_batch("STOCKSYNC_YANDEX_PRICE_BATCH", "500")?,
    };

    Ok(AppConfig {
        ozon,
        yandex,
        supplier_feed_url,
        log_level,
        request_timeout_secs,
        user_agent,
        ozon_limits,
        yandex_limits,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
