//! Service catalogue management: save (with image), toggle, delete.

use crate::models::{ImageUpload, Service, ServiceForm, ServicePatch};
use crate::store::{SiteStore, StoreError};

/// Result of a dashboard form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub service: Service,
    pub created: bool,
}

impl SaveOutcome {
    #[must_use]
    pub fn message(&self) -> &'static str {
        if self.created { "Serviço adicionado com sucesso!" } else { "Serviço atualizado com sucesso!" }
    }
}

/// Validate the form, upload the image if one was chosen, then insert or update.
///
/// Editing without a new image keeps the stored photo. Editing with a new
/// image replaces it and removes the old file. Editing never changes the
/// active flag; that is what [`toggle_service_status`] is for.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] before any remote call when the form or
/// image is invalid, otherwise the first failing remote call's error.
pub async fn save_service(
    store: &dyn SiteStore,
    token: &str,
    form: &ServiceForm,
    image: Option<ImageUpload>,
    editing_id: Option<i64>,
) -> Result<SaveOutcome, StoreError> {
    let mut payload = form.validate()?;
    if let Some(image) = &image {
        image.validate()?;
    }

    let previous_photo = match editing_id {
        Some(id) if image.is_some() => store.get_service_by_id(token, id).await?.photo_url,
        _ => None,
    };

    if let Some(image) = image {
        payload.photo_url = Some(store.upload_service_image(token, image).await?);
    }

    let Some(id) = editing_id else {
        let service = store.add_service(token, &payload).await?;
        tracing::info!(service_id = service.id, "service created");
        return Ok(SaveOutcome { service, created: true });
    };

    let patch = ServicePatch { active: None, ..ServicePatch::from(payload) };
    let service = store.update_service(token, id, &patch).await?;
    tracing::info!(service_id = id, "service updated");

    if let Some(old) = previous_photo.filter(|old| service.photo_url.as_deref() != Some(old.as_str())) {
        if let Err(e) = store.delete_service_image(token, &old).await {
            tracing::warn!(service_id = id, photo_url = %old, error = %e, "replaced image could not be removed");
        }
    }

    Ok(SaveOutcome { service, created: false })
}

/// Flip a service between active and inactive, returning the updated row.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] for an unknown id or the remote error.
pub async fn toggle_service_status(store: &dyn SiteStore, token: &str, id: i64) -> Result<Service, StoreError> {
    let current = store.get_service_by_id(token, id).await?;
    store
        .update_service(token, id, &ServicePatch::active(!current.active))
        .await
}

#[must_use]
pub fn status_message(active: bool) -> &'static str {
    if active { "Serviço ativado" } else { "Serviço desativado" }
}

/// Hard delete: row first, then its stored image.
///
/// # Errors
///
/// Returns the remote error when the row cannot be read or deleted.
pub async fn delete_service(store: &dyn SiteStore, token: &str, id: i64) -> Result<(), StoreError> {
    store.delete_service(token, id, true).await?;
    tracing::info!(service_id = id, "service deleted");
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
