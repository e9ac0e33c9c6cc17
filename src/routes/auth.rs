//! Auth routes: login/logout pages, JSON session endpoints, session cookies.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::api::ApiError;
use super::flash::{self, Flash};
use super::guard::AdminSession;
use crate::state::AppState;
use crate::supabase::auth::{AuthSession, AuthUser};
use crate::views::{LoginView, render_template};

pub const ACCESS_COOKIE: &str = "sb_access_token";
pub const REFRESH_COOKIE: &str = "sb_refresh_token";

const REFRESH_MAX_AGE_DAYS: i64 = 30;

// =============================================================================
// COOKIES
// =============================================================================

fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Store both tokens of a fresh session.
#[must_use]
pub(crate) fn with_session(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        session.access_token.clone(),
        Duration::seconds(session.expires_in.max(0)),
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        session.refresh_token.clone(),
        Duration::days(REFRESH_MAX_AGE_DAYS),
        secure,
    ))
}

#[must_use]
pub(crate) fn without_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure))
        .add(session_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure))
}

/// Non-empty cookie value.
pub(crate) fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Clear the session and send the browser to the login page.
pub(crate) fn signed_out(jar: CookieJar, secure: bool) -> Response {
    let jar = without_session(jar, secure);
    let jar = flash::set(jar, &Flash::error("Sessão expirada. Faça login novamente."), secure);
    (jar, Redirect::to("/login")).into_response()
}

// =============================================================================
// PAGES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /login`: sign-in form; an already valid session goes straight to `/admin`.
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = cookie_value(&jar, ACCESS_COOKIE) {
        if state.store.get_session(&token).await.is_ok() {
            return Redirect::to("/admin").into_response();
        }
    }

    let (jar, flash) = flash::take(jar, state.config.cookie_secure);
    (jar, render_template(&LoginView { flash, email: String::new() })).into_response()
}

/// `POST /login`: sign in, set session cookies, redirect to the dashboard.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim().to_owned();
    if email.is_empty() || form.password.is_empty() {
        let view = LoginView { flash: Some(Flash::error("Informe email e senha")), email };
        return (StatusCode::UNPROCESSABLE_ENTITY, render_template(&view)).into_response();
    }

    match state.store.sign_in(&email, &form.password).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "admin signed in");
            let jar = with_session(jar, &session, state.config.cookie_secure);
            (jar, Redirect::to("/admin")).into_response()
        }
        Err(e) => {
            tracing::warn!(%email, error = %e, "sign-in rejected");
            let view = LoginView { flash: Some(Flash::error(e.to_string())), email };
            (StatusCode::UNAUTHORIZED, render_template(&view)).into_response()
        }
    }
}

/// `POST /logout`: end the remote session and clear cookies.
///
/// Cookies are cleared even when the remote sign-out fails.
pub async fn logout_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let secure = state.config.cookie_secure;
    let flash = match cookie_value(&jar, ACCESS_COOKIE) {
        Some(token) => match state.store.sign_out(&token).await {
            Ok(()) => Flash::success("Logout realizado com sucesso!"),
            Err(e) => {
                tracing::warn!(error = %e, "remote sign-out failed");
                Flash::error("Erro ao fazer logout")
            }
        },
        None => Flash::success("Logout realizado com sucesso!"),
    };

    let jar = flash::set(without_session(jar, secure), &flash, secure);
    (jar, Redirect::to("/login")).into_response()
}

// =============================================================================
// JSON
// =============================================================================

/// `POST /api/auth/login`: exchange credentials for a session.
///
/// # Errors
///
/// Returns 422 for missing fields, 400 with the backend message for bad credentials.
pub async fn api_login(State(state): State<AppState>, Json(body): Json<LoginForm>) -> Result<Json<AuthSession>, ApiError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Informe email e senha"));
    }
    let session = state
        .store
        .sign_in(email, &body.password)
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    tracing::info!(user_id = %session.user.id, "api sign-in");
    Ok(Json(session))
}

/// `POST /api/auth/logout`: end the bearer token's session.
///
/// # Errors
///
/// Returns the mapped store error.
pub async fn api_logout(State(state): State<AppState>, session: AdminSession) -> Result<StatusCode, ApiError> {
    state.store.sign_out(&session.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: the signed-in user.
pub async fn me(session: AdminSession) -> Json<AuthUser> {
    Json(session.user)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
