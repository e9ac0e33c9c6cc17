//! Thin typed HTTP client for the hosted backend.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` shared by three endpoint families: PostgREST table
//! access (`rest`), GoTrue auth (`auth`) and object storage (`storage`).
//! Every request carries the project key as `apikey`; the bearer token is
//! the signed-in user's access token when one is given, the project key
//! otherwise. Non-2xx responses become [`SupabaseError::Api`] with the
//! message extracted from the JSON error body.

pub mod auth;
pub mod rest;
pub mod storage;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::config::SupabaseConfig;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// A success body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A public URL did not point into the configured bucket.
    #[error("URL inválida")]
    InvalidStorageUrl,
}

impl SupabaseError {
    /// The backend rejected the credentials (expired or revoked token).
    ///
    /// Only 401: PostgREST and Storage answer 403 for row-level security
    /// denials, which say nothing about the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// The auth server rejected an access token. GoTrue answers 403
    /// (`bad_jwt`) as well as 401 for an expired or malformed token.
    #[must_use]
    pub fn is_rejected_token(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// A single-row request matched nothing. PostgREST answers 406 for that.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404 | 406, .. })
    }

    /// Message suitable for showing to an operator.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| SupabaseError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.key.clone(),
            bucket: config.storage_bucket.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the project key and bearer token.
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.api_key);
        request
            .header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {bearer}"))
    }

    /// Send and return the body text of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, SupabaseError> {
        let response = request
            .send()
            .await
            .map_err(|e| SupabaseError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SupabaseError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(SupabaseError::Api { status: status.as_u16(), message: error_message(&text, status) });
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SupabaseError> {
        let text = self.send(request).await?;
        parse_body(&text)
    }
}

#[cfg(test)]
pub(crate) fn test_client() -> SupabaseClient {
    use crate::config::SupabaseTimeouts;

    let config = SupabaseConfig {
        url: "https://demo.supabase.co/".into(),
        key: "anon-key".into(),
        storage_bucket: "service-images".into(),
        timeouts: SupabaseTimeouts { request_secs: 30, connect_secs: 10 },
    };
    SupabaseClient::new(&config).expect("test client should build")
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, SupabaseError> {
    serde_json::from_str(text).map_err(|e| SupabaseError::Parse(e.to_string()))
}

/// Pull a human-readable message out of a PostgREST, GoTrue or Storage error body.
pub(crate) fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
    });

    match from_json {
        Some(msg) if !msg.trim().is_empty() => msg,
        _ if !body.trim().is_empty() => body.trim().to_owned(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
