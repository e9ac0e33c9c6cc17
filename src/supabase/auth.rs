//! GoTrue auth endpoints: password sign-in, refresh, sign-out, current user.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SupabaseClient, SupabaseError};

/// The signed-in account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Tokens issued by a sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl SupabaseClient {
    pub(crate) fn password_grant_request(&self, email: &str, password: &str) -> RequestBuilder {
        let request = self
            .http
            .post(self.endpoint("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        self.authorize(request, None)
    }

    pub(crate) fn refresh_grant_request(&self, refresh_token: &str) -> RequestBuilder {
        let request = self
            .http
            .post(self.endpoint("auth/v1/token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token });
        self.authorize(request, None)
    }

    pub(crate) fn user_request(&self, access_token: &str) -> RequestBuilder {
        self.authorize(self.http.get(self.endpoint("auth/v1/user")), Some(access_token))
    }

    pub(crate) fn logout_request(&self, access_token: &str) -> RequestBuilder {
        self.authorize(self.http.post(self.endpoint("auth/v1/logout")), Some(access_token))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Api`] for rejected credentials and transport errors otherwise.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        self.send_json(self.password_grant_request(email, password))
            .await
    }

    /// Exchange a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Api`] when the refresh token is no longer valid.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, SupabaseError> {
        self.send_json(self.refresh_grant_request(refresh_token))
            .await
    }

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    ///
    /// Returns a 401/403 [`SupabaseError::Api`] for expired or revoked tokens.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        self.send_json(self.user_request(access_token)).await
    }

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        self.send(self.logout_request(access_token))
            .await
            .map(|_| ())
    }
}
