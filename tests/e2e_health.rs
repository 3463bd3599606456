//! E2E tests for health and metrics endpoints

mod common;

use common::TestServer;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "OK");
}

#[tokio::test]
async fn test_metrics_endpoint_is_prometheus_text() {
    let server = TestServer::new().await;

    // Generate at least one observation
    let _ = server
        .client
        .get(server.url("/api/v1/site"))
        .send()
        .await
        .expect("request succeeds");

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content-type header")
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    // The request above was counted against its route template
    let body = response.text().await.expect("body");
    assert!(body.contains("brickworks_http_requests_total"));
    assert!(body.contains(r#"endpoint="/api/v1/site""#));
    assert!(body.contains("brickworks_http_request_duration_seconds"));
}
