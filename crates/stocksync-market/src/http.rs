//! Blocking HTTP plumbing shared by the marketplace clients.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::MarketError;

/// Longest error-body excerpt carried in [`MarketError::UnexpectedStatus`].
const BODY_PREVIEW_CHARS: usize = 500;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, MarketError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base_url`, making sure it ends with exactly one slash so that
/// `Url::join` appends to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, MarketError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| MarketError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, MarketError> {
    base_url.join(path).map_err(|e| MarketError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: format!("cannot join \"{path}\": {e}"),
    })
}

/// Sends `request` and returns the response body of a 2xx reply.
pub(crate) fn send(request: RequestBuilder, url: &Url) -> Result<String, MarketError> {
    let response = request.send()?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        tracing::error!(status = status.as_u16(), %url, "marketplace request failed");
        return Err(MarketError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body: preview(&body),
        });
    }

    Ok(response.text()?)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, MarketError> {
    serde_json::from_str(body).map_err(|e| MarketError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if preview.len() < body.len() {
        preview.push_str("...");
    }
    preview
}
