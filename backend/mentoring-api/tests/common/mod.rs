#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use mentoring_api::{
    config::Config, create_router, i18n::I18n, services::block_store::InMemoryBlockStore,
    services::AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app_state = Arc::new(AppState::with_store(
        Config::default(),
        Arc::new(InMemoryBlockStore::new()),
        I18n::default(),
    ));

    create_router(app_state)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });

    (status, json)
}

/// Seeds the MCQ used across tests: choices a/b/c, "a" correct, tips on "a" and "b"+"a".
pub async fn seed_fruit_mcq(app: &Router) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/v1/blocks",
        Some(json!({
            "id": "fruit",
            "question": "Which fruit is red?",
            "kind": {"type": "mcq"},
            "custom_choices": [
                {"value": "a", "display_name": "Apple"},
                {"value": "b", "display_name": "Banana"},
                {"value": "c", "display_name": "Cherry"}
            ],
            "correct_choices": ["a"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed failed: {}", json);

    for (content, values) in [
        ("<p>Apples are red</p>", json!(["a"])),
        ("<p>Think about colors</p>", json!(["b", "a"])),
    ] {
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/blocks/fruit/tips",
            Some(json!({"content": content, "values": values})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    json
}
