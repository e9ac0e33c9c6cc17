//! [`SiteStore`] over the Supabase HTTP client.

use time::OffsetDateTime;

use super::{SiteStore, StoreError};
use crate::models::{Feedback, ImageUpload, NewFeedback, NewService, Service, ServicePatch};
use crate::supabase::auth::{AuthSession, AuthUser};
use crate::supabase::rest::Query;
use crate::supabase::storage::service_image_path;
use crate::supabase::{SupabaseClient, SupabaseError};

const SERVICES: &str = "services";
const FEEDBACKS: &str = "feedbacks";

pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

/// Log a failed remote call and convert it.
fn fail(context: &'static str) -> impl FnOnce(SupabaseError) -> StoreError {
    move |e| {
        tracing::error!(operation = context, error = %e, "supabase call failed");
        StoreError::backend(context, e)
    }
}

/// Like [`fail`], but a zero-row single response becomes `NotFound`.
fn fail_single(context: &'static str, entity: &'static str) -> impl FnOnce(SupabaseError) -> StoreError {
    move |e| {
        if e.is_not_found() {
            tracing::debug!(operation = context, "row not found");
            return StoreError::NotFound(entity);
        }
        fail(context)(e)
    }
}

#[async_trait::async_trait]
impl SiteStore for SupabaseStore {
    async fn get_services(&self) -> Result<Vec<Service>, StoreError> {
        let query = Query::new().eq("active", true).newest_first();
        self.client
            .select(SERVICES, &query, None)
            .await
            .map_err(fail("Erro ao buscar serviços"))
    }

    async fn get_all_services(&self, token: &str) -> Result<Vec<Service>, StoreError> {
        self.client
            .select(SERVICES, &Query::new().newest_first(), Some(token))
            .await
            .map_err(fail("Erro ao buscar serviços"))
    }

    async fn get_service_by_id(&self, token: &str, id: i64) -> Result<Service, StoreError> {
        self.client
            .select_single(SERVICES, &Query::new().eq("id", id), Some(token))
            .await
            .map_err(fail_single("Erro ao buscar serviço", "Serviço"))
    }

    async fn add_service(&self, token: &str, service: &NewService) -> Result<Service, StoreError> {
        self.client
            .insert(SERVICES, service, Some(token))
            .await
            .map_err(fail("Erro ao adicionar serviço"))
    }

    async fn update_service(&self, token: &str, id: i64, patch: &ServicePatch) -> Result<Service, StoreError> {
        self.client
            .update(SERVICES, &Query::new().eq("id", id), patch, Some(token))
            .await
            .map_err(fail_single("Erro ao atualizar serviço", "Serviço"))
    }

    async fn remove_service_row(&self, token: &str, id: i64) -> Result<(), StoreError> {
        self.client
            .delete(SERVICES, &Query::new().eq("id", id), Some(token))
            .await
            .map_err(fail("Erro ao deletar serviço"))
    }

    async fn get_feedbacks(&self) -> Result<Vec<Feedback>, StoreError> {
        let query = Query::new().eq("is_approved", true).newest_first();
        self.client
            .select(FEEDBACKS, &query, None)
            .await
            .map_err(fail("Erro ao buscar feedbacks"))
    }

    async fn get_all_feedbacks(&self, token: &str) -> Result<Vec<Feedback>, StoreError> {
        self.client
            .select(FEEDBACKS, &Query::new().newest_first(), Some(token))
            .await
            .map_err(fail("Erro ao buscar feedbacks"))
    }

    async fn add_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, StoreError> {
        self.client
            .insert(FEEDBACKS, feedback, None)
            .await
            .map_err(fail("Erro ao enviar feedback"))
    }

    async fn approve_feedback(&self, token: &str, id: i64, approved: bool) -> Result<Feedback, StoreError> {
        let patch = serde_json::json!({ "is_approved": approved });
        self.client
            .update(FEEDBACKS, &Query::new().eq("id", id), &patch, Some(token))
            .await
            .map_err(fail_single("Erro ao aprovar feedback", "Feedback"))
    }

    async fn delete_feedback(&self, token: &str, id: i64) -> Result<(), StoreError> {
        self.client
            .delete(FEEDBACKS, &Query::new().eq("id", id), Some(token))
            .await
            .map_err(fail("Erro ao deletar feedback"))
    }

    async fn upload_service_image(&self, token: &str, image: ImageUpload) -> Result<String, StoreError> {
        image.validate()?;
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let path = service_image_path(millis, &image.extension());

        self.client
            .upload(&path, image.bytes, &image.content_type, Some(token))
            .await
            .map_err(fail("Erro ao fazer upload"))?;

        tracing::info!(%path, "service image uploaded");
        Ok(self.client.public_url(&path))
    }

    async fn delete_service_image(&self, token: &str, photo_url: &str) -> Result<(), StoreError> {
        let path = self
            .client
            .object_path_from_url(photo_url)
            .map_err(fail("Erro ao deletar imagem"))?;
        self.client
            .remove(&[path], Some(token))
            .await
            .map_err(fail("Erro ao deletar imagem"))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        // Bad credentials come back as 400, so they stay a Backend error with the message.
        self.client
            .sign_in_with_password(email, password)
            .await
            .map_err(fail("Erro ao fazer login"))
    }

    async fn sign_out(&self, token: &str) -> Result<(), StoreError> {
        self.client
            .sign_out(token)
            .await
            .map_err(fail("Erro ao fazer logout"))
    }

    async fn get_session(&self, token: &str) -> Result<AuthUser, StoreError> {
        self.client
            .get_user(token)
            .await
            .map_err(|e| {
                if e.is_rejected_token() {
                    return StoreError::Unauthorized;
                }
                fail("Erro ao buscar sessão")(e)
            })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, StoreError> {
        self.client
            .refresh_session(refresh_token)
            .await
            .map_err(fail("Erro ao renovar sessão"))
    }
}
