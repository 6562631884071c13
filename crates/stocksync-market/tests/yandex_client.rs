//! Integration tests for `YandexClient` against a wiremock Partner API.

use std::num::NonZeroUsize;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use stocksync_core::{BatchLimits, FailureKind, SupplierRecord, YandexCampaign};
use stocksync_market::{
    list_all_offer_ids, sync_marketplace, CatalogSource, MarketError, SyncOptions, YandexClient,
};

fn campaign() -> YandexCampaign {
    YandexCampaign {
        label: "fbs".to_owned(),
        campaign_id: "1001".to_owned(),
        warehouse_id: "55".to_owned(),
    }
}

fn test_client(base_url: &str, stock: usize, price: usize) -> YandexClient {
    let limits = BatchLimits {
        stock: NonZeroUsize::new(stock).unwrap(),
        price: NonZeroUsize::new(price).unwrap(),
    };
    YandexClient::with_base_url("ym-token", campaign(), limits, 5, "stocksync-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn mapping_page(skus: &[&str], next: Option<&str>) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = skus
        .iter()
        .map(|sku| json!({"offer": {"shopSku": sku, "name": "Casio"}, "mapping": {}}))
        .collect();
    let paging = match next {
        Some(token) => json!({"nextPageToken": token}),
        None => json!({}),
    };
    json!({"status": "OK", "result": {"offerMappingEntries": entries, "paging": paging}})
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_offers_across_token_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campaigns/1001/offer-mapping-entries"))
        .and(header("Authorization", "Bearer ym-token"))
        .and(query_param("limit", "200"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mapping_page(&["A-1", "A-2"], Some("t2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/campaigns/1001/offer-mapping-entries"))
        .and(query_param("page_token", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mapping_page(&["A-3"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (label, offers) = tokio::task::spawn_blocking(move || {
        let client = test_client(&uri, 2000, 500);
        (client.label().to_owned(), list_all_offer_ids(&client))
    })
    .await
    .expect("blocking task panicked");

    assert_eq!(label, "yandex-fbs");
    assert_eq!(offers.expect("listing should succeed"), vec!["A-1", "A-2", "A-3"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sync_uses_warehouse_and_rur_prices() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campaigns/1001/offer-mapping-entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mapping_page(&["123", "456"], None)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/campaigns/1001/offers/stocks"))
        .and(body_partial_json(json!({"skus": [
            {"sku": "123", "warehouseId": "55", "items": [{"count": 7, "type": "FIT"}]},
            {"sku": "456", "warehouseId": "55", "items": [{"count": 0, "type": "FIT"}]}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/campaigns/1001/offer-prices/updates"))
        .and(body_partial_json(json!({"offers": [
            {"id": "123", "price": {"value": 5990, "currencyId": "RUR"}}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    let feed = vec![SupplierRecord::new("123", "7", "5'990.00 руб.")];
    let uri = server.uri();
    let report = tokio::task::spawn_blocking(move || {
        let client = test_client(&uri, 2000, 500);
        sync_marketplace(&client, &feed, SyncOptions::default())
    })
    .await
    .expect("blocking task panicked")
    .expect("sync should succeed");

    assert_eq!(report.target, "yandex-fbs");
    assert_eq!(report.stock.records.len(), 2);
    assert_eq!(report.price.records.len(), 1);

    // Every stock item carries a whole-second UTC timestamp.
    let requests: Vec<Request> = server.received_requests().await.unwrap_or_default();
    let stock_request = requests
        .iter()
        .find(|r| r.url.path() == "/campaigns/1001/offers/stocks")
        .expect("stock request recorded");
    let body: serde_json::Value = serde_json::from_slice(&stock_request.body).unwrap();
    let updated_at = body["skus"][0]["items"][0]["updatedAt"].as_str().unwrap();
    assert_eq!(updated_at.len(), "2024-01-01T00:00:00Z".len(), "{updated_at}");
    assert!(updated_at.ends_with('Z'));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_catalog_is_reported_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/campaigns/1001/offer-mapping-entries"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mapping_page(&[], None))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let limits = BatchLimits {
            stock: NonZeroUsize::new(10).unwrap(),
            price: NonZeroUsize::new(10).unwrap(),
        };
        let client =
            YandexClient::with_base_url("ym-token", campaign(), limits, 1, "stocksync-test/0.1", &uri)
                .expect("client construction should not fail");
        list_all_offer_ids(&client)
    })
    .await
    .expect("blocking task panicked");

    let err = result.expect_err("request should time out");
    assert!(matches!(err, MarketError::Http(_)), "got: {err:?}");
    assert_eq!(err.failure_kind(), FailureKind::Timeout);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_reported_as_connection_failure() {
    // Port 1 is reserved and closed on test hosts.
    let result = tokio::task::spawn_blocking(move || {
        let client = test_client("http://127.0.0.1:1", 10, 10);
        list_all_offer_ids(&client)
    })
    .await
    .expect("blocking task panicked");

    let err = result.expect_err("connection should fail");
    assert_eq!(err.failure_kind(), FailureKind::Connection, "got: {err:?}");
}
