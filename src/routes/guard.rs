//! Admin route guard.
//!
//! DESIGN
//! ======
//! Pages carry the session in cookies, the JSON API in a bearer header. Both
//! guards ask the backend who owns the token on every request; nothing about
//! the session is trusted locally. Pages get one extra chance: a rejected
//! access token is exchanged for a new one with the refresh cookie, and the
//! new pair is written back on the response.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::api::ApiError;
use super::auth::{self, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::state::AppState;
use crate::store::{SiteStore, StoreError};
use crate::supabase::auth::AuthUser;

/// A verified admin session, placed in request extensions by the guards.
/// Use as a handler parameter on guarded routes.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user: AuthUser,
    pub access_token: String,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Ask the backend for the token's user. Any failure counts as signed out.
async fn verify(store: &dyn SiteStore, token: &str) -> Option<AuthUser> {
    match store.get_session(token).await {
        Ok(user) => Some(user),
        Err(StoreError::Unauthorized) => {
            tracing::debug!("access token rejected");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "session check failed; treating as signed out");
            None
        }
    }
}

/// Token from `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// =============================================================================
// PAGES
// =============================================================================

/// Cookie guard for the admin pages. Redirects to `/login` when there is no
/// usable session.
pub async fn require_admin(State(state): State<AppState>, jar: CookieJar, mut request: Request, next: Next) -> Response {
    let secure = state.config.cookie_secure;

    if let Some(token) = auth::cookie_value(&jar, ACCESS_COOKIE) {
        if let Some(user) = verify(state.store.as_ref(), &token).await {
            request.extensions_mut().insert(AdminSession { user, access_token: token });
            return next.run(request).await;
        }
    }

    if let Some(refresh_token) = auth::cookie_value(&jar, REFRESH_COOKIE) {
        match state.store.refresh_session(&refresh_token).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "admin session refreshed");
                let jar = auth::with_session(jar, &session, secure);
                request
                    .extensions_mut()
                    .insert(AdminSession { user: session.user, access_token: session.access_token });
                let response = next.run(request).await;
                return (jar, response).into_response();
            }
            Err(e) => tracing::info!(error = %e, "session refresh failed"),
        }
    }

    let jar = auth::without_session(jar, secure);
    (jar, Redirect::to("/login")).into_response()
}

// =============================================================================
// API
// =============================================================================

/// Bearer guard for the JSON API. Answers 401 when the token is missing or rejected.
pub async fn require_admin_api(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return ApiError::from(StoreError::Unauthorized).into_response();
    };

    match verify(state.store.as_ref(), &token).await {
        Some(user) => {
            request.extensions_mut().insert(AdminSession { user, access_token: token });
            next.run(request).await
        }
        None => ApiError::from(StoreError::Unauthorized).into_response(),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
