//! Admin dashboard pages. Every route here sits behind [`super::guard::require_admin`].
//!
//! Actions follow post/redirect/get: they report their outcome as a flash
//! toast and redirect back to `/admin`. The one exception is a service form
//! that fails validation, which re-renders the dashboard with the input kept.

use axum::extract::multipart::MultipartError;
use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::auth;
use super::flash::{self, Flash};
use super::guard::AdminSession;
use crate::models::{ImageUpload, MAX_IMAGE_BYTES, ServiceForm, ValidationError};
use crate::services::{catalog, dashboard, feedback};
use crate::state::AppState;
use crate::store::StoreError;
use crate::views::{AdminView, ServiceFormView, render_template};

/// Request body limit for the service form: the largest accepted image plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub edit: Option<i64>,
}

/// `GET /admin`: services and feedback tables plus the service form.
/// `?edit={id}` pre-fills the form from that service.
pub async fn dashboard(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Response {
    render_dashboard(&state, &session, jar, None, query.edit, StatusCode::OK).await
}

async fn render_dashboard(
    state: &AppState,
    session: &AdminSession,
    jar: CookieJar,
    form: Option<ServiceFormView>,
    edit: Option<i64>,
    status: StatusCode,
) -> Response {
    let secure = state.config.cookie_secure;
    let data = dashboard::load(state.store.as_ref(), &session.access_token).await;
    if data.unauthorized() {
        return auth::signed_out(jar, secure);
    }

    let (jar, flash) = flash::take(jar, secure);
    let user_email = session.user.email.clone().unwrap_or_default();
    let view = AdminView::new(data, user_email, flash, form, edit, &state.config);
    (status, jar, render_template(&view)).into_response()
}

/// Turn an action's outcome into a toast and a redirect.
fn finish(state: &AppState, jar: CookieJar, outcome: Result<String, StoreError>, failure: &'static str) -> Response {
    let secure = state.config.cookie_secure;
    let toast = match outcome {
        Ok(message) => Flash::success(message),
        Err(StoreError::Unauthorized) => return auth::signed_out(jar, secure),
        Err(StoreError::Validation(e)) => Flash::error(e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, action = failure, "admin action failed");
            Flash::error(failure)
        }
    };
    (flash::set(jar, &toast, secure), Redirect::to("/admin")).into_response()
}

// =============================================================================
// SERVICES
// =============================================================================

struct ServiceSubmission {
    form: ServiceForm,
    image: Option<ImageUpload>,
    /// Raw hidden field; blank means a new service.
    editing_id: Option<String>,
}

fn parse_editing_id(raw: Option<&str>) -> Result<Option<i64>, std::num::ParseIntError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => id.parse().map(Some),
    }
}

async fn read_service_form(mut multipart: Multipart) -> Result<ServiceSubmission, MultipartError> {
    let mut submission = ServiceSubmission { form: ServiceForm::default(), image: None, editing_id: None };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => submission.form.title = field.text().await?,
            "description" => submission.form.description = field.text().await?,
            "price" => submission.form.price = field.text().await?,
            "editing_id" => submission.editing_id = Some(field.text().await?),
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                // An empty file input still submits a part with no name and no bytes.
                if !file_name.is_empty() && !bytes.is_empty() {
                    submission.image = Some(ImageUpload { file_name, content_type, bytes: bytes.to_vec() });
                }
            }
            _ => {}
        }
    }
    Ok(submission)
}

/// `POST /admin/services`: create, or update when `editing_id` is set.
pub async fn save_service(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    let submission = match read_service_form(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable service form");
            let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ValidationError::ImageTooLarge.to_string()
            } else {
                "Erro ao salvar serviço".to_owned()
            };
            let jar = flash::set(jar, &Flash::error(message), state.config.cookie_secure);
            return (jar, Redirect::to("/admin")).into_response();
        }
    };

    let ServiceSubmission { form, image, editing_id } = submission;
    let editing_id = match parse_editing_id(editing_id.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "service form with malformed editing_id");
            let jar = flash::set(jar, &Flash::error("Erro ao salvar serviço"), state.config.cookie_secure);
            return (jar, Redirect::to("/admin")).into_response();
        }
    };
    let outcome = catalog::save_service(state.store.as_ref(), &session.access_token, &form, image, editing_id).await;

    match outcome {
        Ok(saved) => finish(&state, jar, Ok(saved.message().to_owned()), "Erro ao salvar serviço"),
        Err(StoreError::Validation(e)) => {
            let jar = flash::set(jar, &Flash::error(e.to_string()), state.config.cookie_secure);
            let form_view = ServiceFormView::resubmitted(&form, editing_id);
            render_dashboard(&state, &session, jar, Some(form_view), None, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(e) => finish(&state, jar, Err(e), "Erro ao salvar serviço"),
    }
}

/// `POST /admin/services/{id}/toggle`
pub async fn toggle_service(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let outcome = catalog::toggle_service_status(state.store.as_ref(), &session.access_token, id)
        .await
        .map(|service| catalog::status_message(service.active).to_owned());
    finish(&state, jar, outcome, "Erro ao atualizar status")
}

/// `POST /admin/services/{id}/delete`: hard delete, image included.
pub async fn delete_service(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let outcome = catalog::delete_service(state.store.as_ref(), &session.access_token, id)
        .await
        .map(|()| "Serviço deletado com sucesso!".to_owned());
    finish(&state, jar, outcome, "Erro ao deletar serviço")
}

// =============================================================================
// FEEDBACK
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    pub approved: String,
}

/// `POST /admin/feedback/{id}/approve`: `approved=true|false`.
pub async fn approve_feedback(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<ApproveForm>,
) -> Response {
    let approved = matches!(form.approved.trim(), "true" | "1" | "on");
    let outcome = feedback::moderate(state.store.as_ref(), &session.access_token, id, approved)
        .await
        .map(|_| feedback::moderation_message(approved).to_owned());
    finish(&state, jar, outcome, "Erro ao processar avaliação")
}

/// `POST /admin/feedback/{id}/delete`
pub async fn delete_feedback(
    State(state): State<AppState>,
    session: AdminSession,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let outcome = feedback::remove(state.store.as_ref(), &session.access_token, id)
        .await
        .map(|()| feedback::DELETED.to_owned());
    finish(&state, jar, outcome, "Erro ao deletar avaliação")
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
