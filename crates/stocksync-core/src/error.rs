use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("no marketplace configured: set OZON_* and/or YANDEX_* credentials")]
    NoMarketplace,
}

/// Errors raised while joining the supplier feed with a marketplace catalog.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The quantity cell is neither a known supplier token nor a
    /// non-negative integer.
    #[error("malformed quantity {raw:?} for supplier code {code}")]
    MalformedQuantity { code: String, raw: String },
}

/// Coarse classification of a failed run, used for top-level reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connection,
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timed out"),
            FailureKind::Connection => write!(f, "connection failed"),
            FailureKind::Other => write!(f, "sync failed"),
        }
    }
}
