//! Data-access service: one method per remote table, storage or auth call.
//!
//! ARCHITECTURE
//! ============
//! Handlers and orchestration code depend on the [`SiteStore`] trait, never
//! on the HTTP client directly. `SupabaseStore` is the production
//! implementation; tests substitute an in-memory store. Nothing is cached:
//! every read goes to the backend.
//!
//! Admin operations take the caller's access token so row-level security on
//! the backend sees the signed-in user. Public operations use the project key.

pub mod supabase;

pub use supabase::SupabaseStore;

use crate::models::{Feedback, ImageUpload, NewFeedback, NewService, Service, ServicePatch, ValidationError};
use crate::supabase::SupabaseError;
use crate::supabase::auth::{AuthSession, AuthUser};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A remote call failed; `context` is the user-facing operation summary.
    #[error("{context}: {}", .source.message())]
    Backend {
        context: &'static str,
        #[source]
        source: SupabaseError,
    },

    /// The requested row does not exist.
    #[error("{0} não encontrado")]
    NotFound(&'static str),

    /// The backend rejected the caller's credentials.
    #[error("Sessão expirada ou inválida")]
    Unauthorized,

    /// Input failed local validation before reaching the backend.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Classify a backend error for an operation.
    #[must_use]
    pub fn backend(context: &'static str, source: SupabaseError) -> Self {
        if source.is_unauthorized() { Self::Unauthorized } else { Self::Backend { context, source } }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait SiteStore: Send + Sync {
    /// Active services, newest first.
    async fn get_services(&self) -> Result<Vec<Service>, StoreError>;

    /// All services including inactive ones (admin view), newest first.
    async fn get_all_services(&self, token: &str) -> Result<Vec<Service>, StoreError>;

    async fn get_service_by_id(&self, token: &str, id: i64) -> Result<Service, StoreError>;

    async fn add_service(&self, token: &str, service: &NewService) -> Result<Service, StoreError>;

    async fn update_service(&self, token: &str, id: i64, patch: &ServicePatch) -> Result<Service, StoreError>;

    /// Remove the row only. Use [`SiteStore::delete_service`] for the full hard delete.
    async fn remove_service_row(&self, token: &str, id: i64) -> Result<(), StoreError>;

    /// Approved feedback, newest first.
    async fn get_feedbacks(&self) -> Result<Vec<Feedback>, StoreError>;

    /// All feedback including pending (admin view), newest first.
    async fn get_all_feedbacks(&self, token: &str) -> Result<Vec<Feedback>, StoreError>;

    /// Submit feedback; it stays hidden until approved.
    async fn add_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, StoreError>;

    async fn approve_feedback(&self, token: &str, id: i64, approved: bool) -> Result<Feedback, StoreError>;

    async fn delete_feedback(&self, token: &str, id: i64) -> Result<(), StoreError>;

    /// Validate and upload a service image, returning its public URL.
    async fn upload_service_image(&self, token: &str, image: ImageUpload) -> Result<String, StoreError>;

    /// Remove a stored image given the public URL saved on a service.
    async fn delete_service_image(&self, token: &str, photo_url: &str) -> Result<(), StoreError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    async fn sign_out(&self, token: &str) -> Result<(), StoreError>;

    /// The user behind an access token, or [`StoreError::Unauthorized`].
    async fn get_session(&self, token: &str) -> Result<AuthUser, StoreError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, StoreError>;

    /// Soft delete sets `active = false`. Hard delete removes the row, then
    /// its stored image. The row is the record of truth: an image that fails
    /// to delete is logged and left behind.
    async fn delete_service(&self, token: &str, id: i64, hard: bool) -> Result<(), StoreError> {
        if !hard {
            self.update_service(token, id, &ServicePatch::active(false))
                .await?;
            return Ok(());
        }

        let service = self.get_service_by_id(token, id).await?;
        self.remove_service_row(token, id).await?;

        if let Some(photo_url) = service.photo_url.as_deref() {
            if let Err(e) = self.delete_service_image(token, photo_url).await {
                tracing::warn!(service_id = id, %photo_url, error = %e, "service deleted but image removal failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
