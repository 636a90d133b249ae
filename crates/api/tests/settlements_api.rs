//! Router tests for the operator API.
//!
//! Requests are driven through the full router (auth layer included) with
//! `tower::ServiceExt::oneshot`, backed by the in-memory ledger.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use pdv_api::{AppState, create_router};
use pdv_core::settlement::{InMemorySettlementLedger, SettlementService};
use pdv_core::split::{SplitConfigHandle, SplitConfiguration};
use pdv_shared::types::Currency;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "test-operator-token";

fn app() -> Router {
    let config = SplitConfiguration::new(dec!(1), Currency::Brl).unwrap();
    let service = SettlementService::new(
        Arc::new(InMemorySettlementLedger::new()),
        SplitConfigHandle::new(config),
    );
    create_router(AppState::new(Arc::new(service), TOKEN))
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn record(app: &Router, reference: &str, total: &str) -> (StatusCode, Value) {
    send(
        app,
        request(
            "POST",
            "/api/v1/settlements",
            Some(json!({ "transaction_reference": reference, "total_amount": total })),
        ),
    )
    .await
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app();
    let req = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_operator_routes_require_token() {
    let app = app();

    let missing = Request::builder()
        .uri("/api/v1/settlements/pending")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert!(body["message"].as_str().unwrap().contains("Bearer token is required"));

    let wrong = Request::builder()
        .uri("/api/v1/settlements/pending")
        .header(header::AUTHORIZATION, "Bearer not-the-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert!(body["message"].as_str().unwrap().contains("Invalid operator token"));
}

#[tokio::test]
async fn test_record_settlement_returns_created_entry() {
    let app = app();
    let (status, body) = record(&app, "PIX-0001", "9.99").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction_reference"], "PIX-0001");
    assert_eq!(body["total_amount"], 999);
    assert_eq!(body["merchant_amount"], 990);
    assert_eq!(body["platform_amount"], 9);
    assert_eq!(body["status"], "PENDING");
    assert!(body["resolved_at"].is_null());
}

#[tokio::test]
async fn test_duplicate_settlement_conflicts() {
    let app = app();
    record(&app, "PIX-DUP", "10.00").await;
    let (status, body) = record(&app, "PIX-DUP", "10.00").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DUPLICATE_TRANSACTION");
}

#[tokio::test]
async fn test_invalid_settlement_is_bad_request() {
    let app = app();

    let (status, body) = record(&app, "   ", "10.00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");

    let (status, _) = record(&app, "PIX-NEG", "-1.00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = record(&app, "PIX-FRACTION", "10.001").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_argument() {
    let app = app();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/settlements",
            Some(json!({ "transaction_reference": "PIX-NO-AMOUNT" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    assert!(body["message"].as_str().unwrap().contains("total_amount"));

    let (status, body) = record(&app, "PIX-TEXT", "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/split-config")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"platform_percent\":"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_resolve_flow_and_report() {
    let app = app();
    let (_, first) = record(&app, "PIX-A", "100.00").await;
    record(&app, "PIX-B", "250.00").await;
    record(&app, "PIX-C", "500.00").await;
    let id = first["id"].as_i64().unwrap();

    let (status, resolved) =
        send(&app, request("POST", &format!("/api/v1/settlements/{id}/resolve"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "RESOLVED");
    assert!(resolved["resolved_at"].is_string());

    let (status, again) =
        send(&app, request("POST", &format!("/api/v1/settlements/{id}/resolve"), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["error"], "ALREADY_RESOLVED");

    let (status, pending) = send(&app, request("GET", "/api/v1/settlements/pending", None)).await;
    assert_eq!(status, StatusCode::OK);
    let refs: Vec<_> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["transaction_reference"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(refs, ["PIX-B", "PIX-C"]);

    let (status, report) = send(&app, request("GET", "/api/v1/settlements/report", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_pending_platform_amount"], 750);
    assert_eq!(report["count_pending"], 2);
    assert_eq!(report["count_resolved"], 1);
    assert_eq!(report["total_resolved_platform_amount"], 100);
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let app = app();

    let (status, body) = send(&app, request("GET", "/api/v1/settlements/42", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = send(&app, request("POST", "/api/v1/settlements/42/resolve", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_is_paginated() {
    let app = app();
    for i in 1..=3 {
        record(&app, &format!("PIX-{i}"), "1.00").await;
    }

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/settlements?page=1&per_page=2", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["transaction_reference"], "PIX-3");
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);
}

#[tokio::test]
async fn test_split_config_update() {
    let app = app();

    let (status, body) = send(&app, request("GET", "/api/v1/split-config", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["platform_percent"], "1");
    assert_eq!(body["merchant_percent"], "99");
    assert_eq!(body["currency"], "BRL");

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/v1/split-config",
            Some(json!({ "platform_percent": "2.5" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["merchant_percent"], "97.5");

    let (_, entry) = record(&app, "PIX-AFTER", "10.00").await;
    assert_eq!(entry["platform_amount"], 25);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/v1/split-config",
            Some(json!({ "platform_percent": "150" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
}
