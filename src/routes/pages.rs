//! Public pages: landing page and the feedback form.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::flash::{self, Flash};
use crate::models::FeedbackForm;
use crate::services::{feedback, landing};
use crate::state::AppState;
use crate::store::StoreError;
use crate::views::{LandingView, render_template};

/// `GET /`
pub async fn landing(State(state): State<AppState>, jar: CookieJar) -> Response {
    let data = landing::load(state.store.as_ref()).await;
    let (jar, flash) = flash::take(jar, state.config.cookie_secure);
    (jar, render_template(&LandingView::new(data, flash, &state.config))).into_response()
}

/// `POST /feedback`: submit and return to the feedback section with a toast.
pub async fn submit_feedback(State(state): State<AppState>, jar: CookieJar, Form(form): Form<FeedbackForm>) -> Response {
    let toast = match feedback::submit(state.store.as_ref(), &form).await {
        Ok(_) => Flash::success(feedback::SUBMITTED),
        Err(StoreError::Validation(e)) => Flash::error(e.to_string()),
        Err(_) => Flash::error(feedback::SUBMIT_FAILED),
    };
    let jar = flash::set(jar, &toast, state.config.cookie_secure);
    (jar, Redirect::to("/#feedback")).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
