//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One axum router serves the server-rendered pages, the JSON API and the
//! static assets. Admin pages sit behind the cookie guard and `/api/admin`
//! behind the bearer guard; everything else is public.

pub mod admin;
pub mod api;
pub mod auth;
pub mod flash;
pub mod guard;
pub mod pages;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, patch, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// HTML pages; `/admin` requires a cookie session.
fn page_routes(state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/services",
            post(admin::save_service).layer(DefaultBodyLimit::max(admin::UPLOAD_BODY_LIMIT)),
        )
        .route("/admin/services/{id}/toggle", post(admin::toggle_service))
        .route("/admin/services/{id}/delete", post(admin::delete_service))
        .route("/admin/feedback/{id}/approve", post(admin::approve_feedback))
        .route("/admin/feedback/{id}/delete", post(admin::delete_feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::require_admin));

    Router::new()
        .route("/", get(pages::landing))
        .route("/feedback", post(pages::submit_feedback))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout_page))
        .merge(admin)
        .with_state(state)
}

/// JSON endpoints; `/api/admin` and the session endpoints require a bearer token.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let guarded = Router::new()
        .route("/api/auth/logout", post(auth::api_logout))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/admin/services",
            get(api::admin_list_services).post(api::admin_create_service),
        )
        .route(
            "/api/admin/services/{id}",
            get(api::admin_get_service)
                .patch(api::admin_update_service)
                .delete(api::admin_delete_service),
        )
        .route("/api/admin/feedbacks", get(api::admin_list_feedbacks))
        .route(
            "/api/admin/feedbacks/{id}",
            patch(api::admin_moderate_feedback).delete(api::admin_delete_feedback),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::require_admin_api));

    Router::new()
        .route("/api/services", get(api::list_services))
        .route("/api/feedbacks", get(api::list_feedbacks).post(api::create_feedback))
        .route("/api/auth/login", post(auth::api_login))
        .merge(guarded)
        .layer(cors)
        .with_state(state)
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .merge(page_routes(state.clone()))
        .merge(api_routes(state))
        .route("/healthz", get(healthz))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
pub(crate) mod test_http;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
