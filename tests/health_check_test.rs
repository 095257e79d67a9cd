//! Health and metrics endpoint tests for order-service.

mod common;

use common::TestApp;
use std::str::FromStr;
use uuid::Uuid;

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "order-service");
}

#[tokio::test]
async fn caller_request_id_is_echoed_on_the_response() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .header("x-request-id", "order-screen-7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "order-screen-7");
}

#[tokio::test]
async fn missing_request_id_is_minted_as_a_uuid() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(Uuid::from_str(request_id).is_ok());
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let app = TestApp::spawn().await;
    let client = app.client();

    // Generate at least one recorded request before scraping.
    client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
}
