//! Top-level run: load the feed once, then sync each selected target in turn.

use std::path::PathBuf;

use stocksync_core::{AppConfig, FailureKind, SupplierRecord};
use stocksync_market::{
    sync_marketplace, CatalogSource, MarketError, Marketplace, OzonClient, SyncOptions, YandexClient,
};
use stocksync_supplier::{FeedError, FileSupplierFeed, HttpSupplierFeed, SupplierFeed};

use crate::Commands;

#[derive(Debug)]
pub(crate) struct RunOptions {
    pub command: Commands,
    pub dry_run: bool,
    pub feed_file: Option<PathBuf>,
}

/// Maps an error chain to the label printed for the operator.
pub(crate) fn failure_kind(err: &anyhow::Error) -> FailureKind {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<MarketError>() {
                Some(e.failure_kind())
            } else {
                cause.downcast_ref::<FeedError>().map(FeedError::failure_kind)
            }
        })
        .unwrap_or(FailureKind::Other)
}

/// Builds one client per selected and configured marketplace target.
///
/// Asking for a single marketplace that has no credentials is an error;
/// `all` quietly covers whatever is configured.
pub(crate) fn build_targets(
    config: &AppConfig,
    command: Commands,
) -> anyhow::Result<Vec<Box<dyn Marketplace>>> {
    let mut targets: Vec<Box<dyn Marketplace>> = Vec::new();

    if command.includes_ozon() {
        match &config.ozon {
            Some(credentials) => {
                let client = OzonClient::new(
                    credentials.clone(),
                    config.ozon_limits,
                    config.request_timeout_secs,
                    &config.user_agent,
                )
                .map_err(|e| anyhow::anyhow!("failed to build Ozon client: {e}"))?;
                targets.push(Box::new(client));
            }
            None if command == Commands::Ozon => {
                anyhow::bail!("Ozon is not configured: set OZON_CLIENT_ID and OZON_SELLER_TOKEN");
            }
            None => {}
        }
    }

    if command.includes_yandex() {
        match &config.yandex {
            Some(settings) => {
                for campaign in &settings.campaigns {
                    let client = YandexClient::new(
                        &settings.token,
                        campaign.clone(),
                        config.yandex_limits,
                        config.request_timeout_secs,
                        &config.user_agent,
                    )
                    .map_err(|e| {
                        anyhow::anyhow!("failed to build Yandex client for {}: {e}", campaign.label)
                    })?;
                    targets.push(Box::new(client));
                }
            }
            None if command == Commands::Yandex => {
                anyhow::bail!(
                    "Yandex Market is not configured: set YANDEX_MARKET_TOKEN and a campaign"
                );
            }
            None => {}
        }
    }

    Ok(targets)
}

fn load_feed(config: &AppConfig, feed_file: Option<&PathBuf>) -> anyhow::Result<Vec<SupplierRecord>> {
    let feed: Box<dyn SupplierFeed> = match feed_file {
        Some(path) => Box::new(FileSupplierFeed::new(path.clone())),
        None => Box::new(HttpSupplierFeed::new(
            config.supplier_feed_url.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )?),
    };

    let source = feed.describe();
    let records = feed.load()?;
    tracing::info!(source = %source, records = records.len(), "loaded supplier feed");
    Ok(records)
}

/// Runs every selected target. Returns `Ok(false)` when at least one target
/// failed; the others still run.
///
/// # Errors
///
/// Returns an error when no target can start: a bad selection, a client
/// that cannot be built, or a supplier feed that cannot be loaded.
pub(crate) fn run(config: &AppConfig, options: &RunOptions) -> anyhow::Result<bool> {
    let targets = build_targets(config, options.command)?;
    if targets.is_empty() {
        anyhow::bail!("no configured marketplace matches the selected command");
    }

    let supplier = load_feed(config, options.feed_file.as_ref())?;
    let sync_options = SyncOptions {
        dry_run: options.dry_run,
    };

    let mut all_ok = true;
    for target in &targets {
        match sync_marketplace(&**target, &supplier, sync_options) {
            Ok(report) => println!("{report}"),
            Err(e) => {
                all_ok = false;
                let kind = e.failure_kind();
                tracing::error!(
                    marketplace = target.label(),
                    error = %e,
                    %kind,
                    "marketplace sync failed"
                );
                eprintln!("{}: {kind}: {e}", target.label());
            }
        }
    }

    Ok(all_ok)
}
