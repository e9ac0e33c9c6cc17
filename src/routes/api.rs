//! JSON API over the same store operations the pages use.
//!
//! Public endpoints need no credentials. Everything under `/api/admin` sits
//! behind [`super::guard::require_admin_api`] and acts with the caller's
//! bearer token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use super::guard::AdminSession;
use crate::models::{Feedback, FeedbackForm, NewService, Service, ServicePatch};
use crate::services::feedback;
use crate::state::AppState;
use crate::store::StoreError;

// =============================================================================
// ERRORS
// =============================================================================

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        StoreError::Backend { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// Error body: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self { status: store_error_to_status(&err), message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

// =============================================================================
// PUBLIC
// =============================================================================

/// `GET /api/services`: active services, newest first.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(state.store.get_services().await?))
}

/// `GET /api/feedbacks`: approved feedback, newest first.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn list_feedbacks(State(state): State<AppState>) -> Result<Json<Vec<Feedback>>, ApiError> {
    Ok(Json(state.store.get_feedbacks().await?))
}

/// Loosely typed so out-of-range or non-numeric ratings reach validation
/// and come back as a JSON error body.
#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: serde_json::Value,
}

fn rating_field(rating: serde_json::Value) -> String {
    match rating {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s,
        _ => String::new(),
    }
}

/// `POST /api/feedbacks`: submit feedback for moderation.
///
/// # Errors
///
/// Returns 422 for an incomplete submission, otherwise the mapped store error.
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(body): Json<FeedbackBody>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    let form = FeedbackForm { rating: rating_field(body.rating), client_name: body.client_name, text: body.text };
    let created = feedback::submit(state.store.as_ref(), &form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// =============================================================================
// ADMIN
// =============================================================================

/// `GET /api/admin/services`: every service, including inactive ones.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn admin_list_services(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(state.store.get_all_services(&session.access_token).await?))
}

/// `POST /api/admin/services`
///
/// # Errors
///
/// Returns 422 when a field is out of range, otherwise the mapped store error.
pub async fn admin_create_service(
    State(state): State<AppState>,
    session: AdminSession,
    Json(body): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let body = body.validated().map_err(StoreError::from)?;
    let service = state.store.add_service(&session.access_token, &body).await?;
    tracing::info!(service_id = service.id, "service created via api");
    Ok((StatusCode::CREATED, Json(service)))
}

/// `GET /api/admin/services/{id}`
///
/// # Errors
///
/// Returns 404 for an unknown id, otherwise the mapped store error.
pub async fn admin_get_service(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(state.store.get_service_by_id(&session.access_token, id).await?))
}

/// `PATCH /api/admin/services/{id}`: partial update; absent fields are kept.
///
/// # Errors
///
/// Returns 422 when a present field is out of range, otherwise the mapped store error.
pub async fn admin_update_service(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<i64>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, ApiError> {
    let patch = patch.validated().map_err(StoreError::from)?;
    Ok(Json(state.store.update_service(&session.access_token, id, &patch).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub hard: bool,
}

/// `DELETE /api/admin/services/{id}`: soft delete, or hard with `?hard=true`.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn admin_delete_service(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<i64>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_service(&session.access_token, id, params.hard)
        .await?;
    tracing::info!(service_id = id, hard = params.hard, "service deleted via api");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/admin/feedbacks`: all feedback, including pending.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn admin_list_feedbacks(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    Ok(Json(state.store.get_all_feedbacks(&session.access_token).await?))
}

#[derive(Debug, Deserialize)]
pub struct ModerationBody {
    pub approved: bool,
}

/// `PATCH /api/admin/feedbacks/{id}`: `{"approved": bool}`.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn admin_moderate_feedback(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<ModerationBody>,
) -> Result<Json<Feedback>, ApiError> {
    let updated = feedback::moderate(state.store.as_ref(), &session.access_token, id, body.approved).await?;
    Ok(Json(updated))
}

/// `DELETE /api/admin/feedbacks/{id}`
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn admin_delete_feedback(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    feedback::remove(state.store.as_ref(), &session.access_token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
