mod common;

use axum::http::StatusCode;
use serde_json::json;

const LEGACY_MCQ: &str = r#"<mcq question="Best fruit?" correct_choices="a, b" weight="2">
    <choice value="a">Apple <i>(red)</i></choice>
    <choice value="b">Banana</choice>
    <choice value="c">Cherry</choice>
    <tip values="a,b">Good pick, <b>really</b>.</tip>
    <tip values="c" width="300px">Too small</tip>
</mcq>"#;

#[tokio::test]
async fn test_import_mcq_and_grade_it() {
    let app = common::create_test_app();

    let (status, json) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/import",
        Some(json!({"xml": LEGACY_MCQ, "id": "legacy"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["block"]["id"], "legacy");
    assert_eq!(json["block"]["weight"], 2.0);
    assert_eq!(json["block"]["correct_choices"], json!(["a", "b"]));
    assert_eq!(
        json["block"]["custom_choices"][0]["display_name"],
        "Apple <i>(red)</i>"
    );
    assert_eq!(json["messages"], json!([]));

    let (_, result) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/legacy/submit",
        Some(json!({"student_id": "s", "submission": "b"})),
    )
    .await;
    assert_eq!(result["status"], "correct");
    assert_eq!(result["weight"], 2.0);
    assert!(result["tips"]
        .as_str()
        .unwrap()
        .contains("Good pick, <b>really</b>."));
}

#[tokio::test]
async fn test_import_rating_uses_default_labels() {
    let app = common::create_test_app();

    let (status, json) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/import",
        Some(json!({"xml": r#"<rating question="Rate us" low="Meh"/>"#})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["block"]["kind"]["type"], "rating");
    assert_eq!(json["block"]["kind"]["low"], "Meh");
    assert_eq!(json["block"]["kind"]["high"], "More");
    assert!(json["block"]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_import_malformed_xml_is_bad_request() {
    let app = common::create_test_app();

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/import",
        Some(json!({"xml": "<mcq><choice value=\"a\">"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_unsupported_root_is_bad_request() {
    let app = common::create_test_app();

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/import",
        Some(json!({"xml": "<slider/>"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Unsupported element <slider>");
}

#[tokio::test]
async fn test_import_empty_xml_is_rejected() {
    let app = common::create_test_app();

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/import",
        Some(json!({"xml": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_tip_into_existing_block() {
    let app = common::create_test_app();
    common::seed_fruit_mcq(&app).await;

    let (status, json) = common::send(
        &app,
        "POST",
        "/api/v1/blocks/fruit/tips/import",
        Some(json!({"xml": r#"<tip values=" c , q" height="120px">Cherries <em>are</em> red too</tip>"#})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let tip = &json["block"]["tips"][2];
    assert_eq!(tip["values"], json!(["c", "q"]));
    assert_eq!(tip["height"], "120px");
    assert_eq!(tip["content"], "Cherries <em>are</em> red too");
    // "q" is not a choice of the block
    assert_eq!(
        json["messages"][0]["text"],
        "A choice selected for this tip does not exist."
    );
}
