use std::collections::HashMap;

use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;

use super::helpers::{json, mock_feed, send};
use crate::{
    exchange_rate::RateSnapshot,
    store::{MemoryRateStore, RateStore},
};

const FEED_OK: &str = r#"{"rates": {"GBP": 0.85, "USD": 1.0625, "AUD": 1.7, "MXN": 0}, "date": "2024-03-01"}"#;
const FEED_NO_GBP: &str = r#"{"rates": {"USD": 1.0625, "AUD": 1.7}, "date": "2024-03-02"}"#;

async fn stored_snapshot() -> MemoryRateStore {
    let store = MemoryRateStore::new();
    let snapshot = RateSnapshot::new(
        "GBP",
        HashMap::from([("USD".to_string(), dec!(1.3)), ("EUR".to_string(), dec!(1.15))]),
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap(),
    );
    store.save(&snapshot).await.unwrap();
    store
}

fn convert_request(body: serde_json::Value) -> TestRequest {
    TestRequest::post().uri("/api/convert").set_json(body)
}

#[actix_web::test]
async fn index_page() {
    let _ = env_logger::try_init().ok();
    let feed = mock_feed(500, "").await;
    let (status, body) = send(TestRequest::get().uri("/"), &feed, &MemoryRateStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("convert-form"));
}

#[actix_web::test]
async fn health() {
    let feed = mock_feed(500, "").await;
    let (status, body) = send(TestRequest::get().uri("/health"), &feed, &MemoryRateStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn last_update_before_any_update() {
    let _ = env_logger::try_init().ok();
    let feed = mock_feed(500, "").await;
    let (status, body) = send(TestRequest::get().uri("/api/last_update"), &feed, &MemoryRateStore::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), json!({"status": "empty", "message": "No rates in database"}));
}

#[actix_web::test]
async fn update_then_last_update() {
    let _ = env_logger::try_init().ok();
    let feed = mock_feed(200, FEED_OK).await;
    let store = MemoryRateStore::new();
    let (status, body) = send(TestRequest::post().uri("/api/update_rates"), &feed, &store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"status": "ok", "base": "GBP", "updated": "2024-03-01T00:00:00Z"}));

    let (status, body) = send(TestRequest::get().uri("/api/last_update"), &feed, &store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"status": "ok", "base": "GBP", "timestamp": "2024-03-01T00:00:00Z"}));

    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.rates.len(), 2);
    assert_eq!(stored.rates["USD"], dec!(0.8));
    assert_eq!(stored.rates["AUD"], dec!(0.5));
    assert!(!stored.rates.contains_key("MXN"));
}

#[actix_web::test]
async fn failed_update_leaves_snapshot_alone() {
    let _ = env_logger::try_init().ok();
    let feed = mock_feed(200, FEED_NO_GBP).await;
    let store = stored_snapshot().await;
    let before = store.load().await.unwrap();
    let (status, body) = send(TestRequest::post().uri("/api/update_rates"), &feed, &store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), json!({"status": "error", "message": "API did not return GBP rate, cannot convert."}));
    assert_eq!(store.load().await.unwrap(), before);
}

#[actix_web::test]
async fn update_with_feed_down() {
    let feed = mock_feed(502, "Bad gateway").await;
    let (status, body) = send(TestRequest::post().uri("/api/update_rates"), &feed, &MemoryRateStore::new()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["status"], "error");
}

#[actix_web::test]
async fn convert_usd_to_eur() {
    let _ = env_logger::try_init().ok();
    let feed = mock_feed(500, "").await;
    let store = stored_snapshot().await;
    let req = convert_request(json!({"from": "usd", "to": "EUR", "amount": "100.00"}));
    let (status, body) = send(req, &feed, &store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        json!({
            "status": "ok",
            "from": "USD",
            "to": "EUR",
            "amount": "100",
            "result": "88.461538",
            "base": "GBP",
            "rates_timestamp": "2024-02-01T12:30:00Z"
        })
    );
}

#[actix_web::test]
async fn convert_base_to_base() {
    let feed = mock_feed(500, "").await;
    let store = stored_snapshot().await;
    let req = convert_request(json!({"from_currency": "GBP", "to_currency": "GBP", "amount": 12.34}));
    let (status, body) = send(req, &feed, &store).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["amount"], "12.34");
    assert_eq!(body["result"], "12.34");
}

#[actix_web::test]
async fn convert_negative_amount() {
    let feed = mock_feed(500, "").await;
    let store = stored_snapshot().await;
    let before = store.load().await.unwrap();
    let (status, body) = send(convert_request(json!({"from": "USD", "to": "EUR", "amount": -5})), &feed, &store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), json!({"status": "error", "message": "Amount must be non-negative."}));
    assert_eq!(store.load().await.unwrap(), before);
}

#[actix_web::test]
async fn convert_bad_input() {
    let feed = mock_feed(500, "").await;
    let store = stored_snapshot().await;
    let cases = [
        (json!({"from": "USD", "amount": 1}), "Both 'from' and 'to' currencies are required."),
        (json!({"from": "USD", "to": "EUR", "amount": "ten"}), "Invalid amount."),
        (json!({"from": "USD", "to": "EUR"}), "Invalid amount."),
        (json!({"from": "USD", "to": "JPY", "amount": 1}), "Unknown currency: JPY"),
        (json!({"from": "XXX", "to": "JPY", "amount": 1}), "Unknown currency: XXX"),
    ];
    for (req, message) in cases {
        let (status, body) = send(convert_request(req), &feed, &store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["message"], message);
    }
}

#[actix_web::test]
async fn convert_malformed_body() {
    let feed = mock_feed(500, "").await;
    let req = TestRequest::post()
        .uri("/api/convert")
        .insert_header(("content-type", "application/json"))
        .set_payload("{oops");
    let (status, body) = send(req, &feed, &stored_snapshot().await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["status"], "error");
}

#[actix_web::test]
async fn convert_array_body() {
    let feed = mock_feed(500, "").await;
    let req = convert_request(json!(["USD", null, "EUR", null, "5"]));
    let (status, body) = send(req, &feed, &stored_snapshot().await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), json!({"status": "error", "message": "Request body must be a JSON object."}));
}

#[actix_web::test]
async fn convert_without_rates() {
    let feed = mock_feed(500, "").await;
    let (status, body) =
        send(convert_request(json!({"from": "USD", "to": "EUR", "amount": 1})), &feed, &MemoryRateStore::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), json!({"status": "error", "message": "Rates not available. Please update rates first."}));
}

#[actix_web::test]
async fn convert_with_zero_rate() {
    let feed = mock_feed(500, "").await;
    let store = MemoryRateStore::new();
    let snapshot = RateSnapshot::new("GBP", HashMap::from([("USD".to_string(), dec!(0))]), Utc::now());
    store.save(&snapshot).await.unwrap();
    let (status, body) = send(convert_request(json!({"from": "USD", "to": "GBP", "amount": 1})), &feed, &store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["message"], "Rate for USD is zero.");
}
