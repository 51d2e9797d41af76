use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    models::{
        choice::AddChoiceRequest,
        question::{CreateQuestionRequest, QuestionFields},
        submission::{StudentStateQuery, StudentStateResponse, SubmitRequest},
        tip::{AddTipRequest, ImportTipRequest, UpdateTipRequest, ValidateTipRequest},
        ImportRequest,
    },
    services::{error::ServiceError, AppState},
};

type HandlerError = (StatusCode, String);

fn bad_request(e: validator::ValidationErrors) -> HandlerError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn service_error(context: &str, e: ServiceError) -> HandlerError {
    let status = e.status_code();
    if status.is_server_error() {
        tracing::error!("{}: {}", context, e);
    } else {
        tracing::warn!("{}: {}", context, e);
    }
    (status, e.to_string())
}

/// POST /api/v1/blocks - create an MCQ or rating block
pub async fn create_block(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .create(req)
        .await
        .map_err(|e| service_error("Failed to create block", e))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/blocks/import - create a block from legacy XML
pub async fn import_block(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;
    tracing::info!("Importing block from legacy XML ({} bytes)", req.xml.len());

    let response = state
        .authoring_service()
        .import(&req.xml, req.id)
        .await
        .map_err(|e| service_error("Failed to import block", e))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/blocks/{id}
pub async fn get_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let question = state
        .store
        .get_question(&block_id)
        .await
        .map_err(|e| service_error("Failed to load block", e.into()))?;

    Ok(Json(question))
}

/// PUT /api/v1/blocks/{id} - save edited fields, returning advisory messages
pub async fn update_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(fields): Json<QuestionFields>,
) -> Result<impl IntoResponse, HandlerError> {
    fields.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .update(&block_id, fields)
        .await
        .map_err(|e| service_error("Failed to update block", e))?;

    Ok(Json(response))
}

/// POST /api/v1/blocks/{id}/choices
pub async fn add_choice(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(req): Json<AddChoiceRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .add_choice(&block_id, req)
        .await
        .map_err(|e| service_error("Failed to add choice", e))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/v1/blocks/{id}/choices/{value}
pub async fn delete_choice(
    State(state): State<Arc<AppState>>,
    Path((block_id, value)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .authoring_service()
        .delete_choice(&block_id, &value)
        .await
        .map_err(|e| service_error("Failed to delete choice", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/blocks/{id}/tips
pub async fn add_tip(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(req): Json<AddTipRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .add_tip(&block_id, req)
        .await
        .map_err(|e| service_error("Failed to add tip", e))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/blocks/{id}/tips/import - attach a legacy `<tip>` element
pub async fn import_tip(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(req): Json<ImportTipRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .import_tip(&block_id, &req.xml)
        .await
        .map_err(|e| service_error("Failed to import tip", e))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/blocks/{id}/tips/{tip_id} - display name and rendered view
pub async fn get_tip(
    State(state): State<Arc<AppState>>,
    Path((block_id, tip_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    let detail = state
        .authoring_service()
        .tip_detail(&block_id, &tip_id)
        .await
        .map_err(|e| service_error("Failed to load tip", e))?;

    Ok(Json(detail))
}

/// PUT /api/v1/blocks/{id}/tips/{tip_id} - edit content, size or values
pub async fn update_tip(
    State(state): State<Arc<AppState>>,
    Path((block_id, tip_id)): Path<(String, String)>,
    Json(req): Json<UpdateTipRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;

    let response = state
        .authoring_service()
        .update_tip(&block_id, &tip_id, req)
        .await
        .map_err(|e| service_error("Failed to update tip", e))?;

    Ok(Json(response))
}

/// DELETE /api/v1/blocks/{id}/tips/{tip_id}
pub async fn delete_tip(
    State(state): State<Arc<AppState>>,
    Path((block_id, tip_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .authoring_service()
        .delete_tip(&block_id, &tip_id)
        .await
        .map_err(|e| service_error("Failed to delete tip", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/blocks/{id}/validate - check field data without saving
pub async fn validate_block(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(fields): Json<QuestionFields>,
) -> Result<impl IntoResponse, HandlerError> {
    let response = state
        .authoring_service()
        .validate(&block_id, &fields)
        .await
        .map_err(|e| service_error("Failed to validate block", e))?;

    Ok(Json(response))
}

/// POST /api/v1/tips/{tip_id}/validate
pub async fn validate_tip(
    State(state): State<Arc<AppState>>,
    Path(tip_id): Path<String>,
    Json(req): Json<ValidateTipRequest>,
) -> impl IntoResponse {
    Json(
        state
            .authoring_service()
            .validate_tip(&tip_id, &req.values)
            .await,
    )
}

/// POST /api/v1/blocks/{id}/submit - grade a student's choice
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    req.validate().map_err(bad_request)?;
    tracing::info!(
        "Submitting choice for block={}, student={}",
        block_id,
        req.student_id
    );

    let result = state
        .submission_service()
        .submit(&block_id, &req.student_id, &req.submission)
        .await
        .map_err(|e| service_error("Failed to grade submission", e))?;

    Ok(Json(result))
}

/// GET /api/v1/blocks/{id}/author_view
pub async fn author_view(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let fragment = state
        .authoring_service()
        .author_edit_view(&block_id)
        .await
        .map_err(|e| service_error("Failed to render author view", e))?;

    Ok(Json(fragment))
}

/// GET /api/v1/blocks/{id}/state?student_id=
pub async fn student_state(
    State(state): State<Arc<AppState>>,
    Path(block_id): Path<String>,
    Query(query): Query<StudentStateQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    query.validate().map_err(bad_request)?;

    let stored = state
        .store
        .get_student_state(&query.student_id, &block_id)
        .await
        .map_err(|e| service_error("Failed to load student state", e.into()))?;

    let response = stored
        .map(StudentStateResponse::from)
        .unwrap_or_else(|| StudentStateResponse::empty(&query.student_id, &block_id));

    Ok(Json(response))
}
