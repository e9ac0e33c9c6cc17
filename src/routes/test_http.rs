//! In-process request helpers for router tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::state::test_helpers::{ACCESS_TOKEN, test_app_state};
use crate::state::AppState;

pub const BOUNDARY: &str = "vitrine-test-boundary";

pub fn router(state: &AppState) -> Router {
    super::app(state.clone())
}

pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    router(state).oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// GET with the session cookie set.
pub fn get_signed_in(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("sb_access_token={ACCESS_TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Option<serde_json::Value>, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A multipart body with text fields and an optional `photo` file part.
pub fn multipart_body(fields: &[(&str, &str)], photo: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post_multipart(uri: &str, body: Vec<u8>, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Every `Set-Cookie` header as `name=value; attrs`.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// The `name=value` pair of a set cookie, ready to send back in a `Cookie` header.
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&format!("{name}=")))
        .and_then(|c| c.split(';').next().map(str::to_owned))
}

/// Follow a redirect's flash cookie to the page it targets and return the page body.
pub async fn follow_flash(state: &AppState, response: &Response<Body>, extra_cookie: Option<&str>) -> String {
    let flash = cookie_pair(response, "flash").unwrap_or_default();
    let cookie = match extra_cookie {
        Some(extra) => format!("{flash}; {extra}"),
        None => flash,
    };
    let request = Request::builder()
        .uri(location(response).split('#').next().unwrap_or("/"))
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    body_text(send(state, request).await).await
}

#[test]
fn router_builds() {
    let (state, _) = test_app_state();
    let _ = router(&state);
}
