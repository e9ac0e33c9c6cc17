//! Visitor feedback: submission from the landing page, moderation from the dashboard.

use crate::models::{Feedback, FeedbackForm};
use crate::store::{SiteStore, StoreError};

pub const SUBMITTED: &str = "Avaliação enviada com sucesso! Ela será exibida após aprovação.";
pub const SUBMIT_FAILED: &str = "❌ Erro ao enviar avaliação. Tente novamente.";
pub const APPROVED: &str = "Avaliação aprovada!";
pub const REJECTED: &str = "Avaliação rejeitada";
pub const DELETED: &str = "Avaliação deletada com sucesso!";

/// Validate and submit a visitor's feedback. New rows stay pending until approved.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] without contacting the backend when the
/// form is incomplete, otherwise the backend error.
pub async fn submit(store: &dyn SiteStore, form: &FeedbackForm) -> Result<Feedback, StoreError> {
    let payload = form.validate()?;
    let feedback = store.add_feedback(&payload).await?;
    tracing::info!(feedback_id = feedback.id, rating = feedback.rating, "feedback submitted");
    Ok(feedback)
}

/// Approve or un-approve a feedback row.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] for an unknown id or the backend error.
pub async fn moderate(store: &dyn SiteStore, token: &str, id: i64, approved: bool) -> Result<Feedback, StoreError> {
    let feedback = store.approve_feedback(token, id, approved).await?;
    tracing::info!(feedback_id = id, approved, "feedback moderated");
    Ok(feedback)
}

#[must_use]
pub fn moderation_message(approved: bool) -> &'static str {
    if approved { APPROVED } else { REJECTED }
}

/// # Errors
///
/// Returns the backend error.
pub async fn remove(store: &dyn SiteStore, token: &str, id: i64) -> Result<(), StoreError> {
    store.delete_feedback(token, id).await?;
    tracing::info!(feedback_id = id, "feedback deleted");
    Ok(())
}

#[cfg(test)]
#[path = "feedback_test.rs"]
mod tests;
