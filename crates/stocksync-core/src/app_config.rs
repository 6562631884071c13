use std::num::NonZeroUsize;

/// Ozon Seller API credentials.
#[derive(Clone)]
pub struct OzonCredentials {
    pub client_id: String,
    pub seller_token: String,
}

impl std::fmt::Debug for OzonCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OzonCredentials")
            .field("client_id", &self.client_id)
            .field("seller_token", &"[redacted]")
            .finish()
    }
}

/// One Yandex Market campaign (seller cabinet) and the warehouse its stock
/// is reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YandexCampaign {
    /// Short name used in logs and reports, e.g. `"fbs"`.
    pub label: String,
    pub campaign_id: String,
    pub warehouse_id: String,
}

#[derive(Clone)]
pub struct YandexSettings {
    pub token: String,
    pub campaigns: Vec<YandexCampaign>,
}

impl std::fmt::Debug for YandexSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexSettings")
            .field("token", &"[redacted]")
            .field("campaigns", &self.campaigns)
            .finish()
    }
}

/// Per-request record ceilings for one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub stock: NonZeroUsize,
    pub price: NonZeroUsize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ozon: Option<OzonCredentials>,
    pub yandex: Option<YandexSettings>,
    pub supplier_feed_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub ozon_limits: BatchLimits,
    pub yandex_limits: BatchLimits,
}
