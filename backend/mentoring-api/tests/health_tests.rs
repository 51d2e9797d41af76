mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::{engine::general_purpose, Engine as _};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check_counts_blocks() {
    let app = common::create_test_app();
    common::seed_fruit_mcq(&app).await;

    let (status, json) = common::send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "mentoring-api");
    assert_eq!(json["blocks"], 1);
}

#[tokio::test]
async fn test_metrics_requires_basic_auth() {
    let app = common::create_test_app();

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let wrong = general_purpose::STANDARD.encode("admin:wrong");
    let request = Request::builder()
        .uri("/metrics")
        .header(header::AUTHORIZATION, format!("Basic {}", wrong))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_metrics_exposes_request_counters() {
    let app = common::create_test_app();
    common::send(&app, "GET", "/health", None).await;

    let credentials = general_purpose::STANDARD.encode("admin:changeme");
    let request = Request::builder()
        .uri("/metrics")
        .header(header::AUTHORIZATION, format!("Basic {}", credentials))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_responses_carry_trace_id() {
    let app = common::create_test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-trace-id"));
}
