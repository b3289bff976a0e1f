//! Health checks and request IDs.

use axum::http::StatusCode;
use grocer_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let mut ctx = TestContext::new().await;

    let live = ctx.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = ctx.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_generated() {
    let mut ctx = TestContext::new().await;

    let first = ctx.get("/").await.request_id.unwrap();
    let second = ctx.get("/").await.request_id.unwrap();
    assert_eq!(first.len(), 36);
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_request_id_propagated() {
    let mut ctx = TestContext::new().await;

    let resp = ctx
        .get_with_headers("/health", &[("x-request-id", "trace-abc-123")])
        .await;
    assert_eq!(resp.request_id.as_deref(), Some("trace-abc-123"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut ctx = TestContext::new().await;

    let resp = ctx.get("/no/such/page").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.request_id.is_some());
}
