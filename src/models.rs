//! Record types mirroring the remote `services` and `feedbacks` tables, plus
//! the form inputs the UI collects for them.
//!
//! DESIGN
//! ======
//! Read rows, insert payloads and partial updates are separate types so
//! serialization never sends fields the caller did not mean to write.
//! Validation here is for UX only; the remote schema stays authoritative.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const TITLE_LEN: std::ops::RangeInclusive<usize> = 3..=100;
pub const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 10..=500;
pub const MIN_PRICE: f64 = 0.01;
pub const MAX_RATING: u8 = 5;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

// =============================================================================
// ROWS
// =============================================================================

/// A row of the `services` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// A row of the `feedbacks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub client_name: String,
    pub text: String,
    pub rating: u8,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

// =============================================================================
// WRITE PAYLOADS
// =============================================================================

/// Insert payload for `services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewService {
    /// Trim text fields, then apply the form rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteService`] when a field is out of range.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_owned();
        self.description = self.description.trim().to_owned();
        ServicePatch::from(self.clone()).validate()?;
        Ok(self)
    }
}

/// Partial update for `services`. Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl ServicePatch {
    #[must_use]
    pub fn active(active: bool) -> Self {
        Self { active: Some(active), ..Self::default() }
    }

    /// Rejects values a full form submission would reject.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteService`] when a present field is out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_ok = self.title.as_deref().is_none_or(|t| TITLE_LEN.contains(&t.trim().chars().count()));
        let description_ok = self
            .description
            .as_deref()
            .is_none_or(|d| DESCRIPTION_LEN.contains(&d.trim().chars().count()));
        let price_ok = self.price.is_none_or(valid_price);
        if title_ok && description_ok && price_ok { Ok(()) } else { Err(ValidationError::IncompleteService) }
    }

    /// Trim present text fields, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteService`] when a present field is out of range.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.map(|t| t.trim().to_owned());
        self.description = self.description.map(|d| d.trim().to_owned());
        self.validate()?;
        Ok(self)
    }
}

impl From<NewService> for ServicePatch {
    fn from(service: NewService) -> Self {
        Self {
            title: Some(service.title),
            description: Some(service.description),
            price: Some(service.price),
            photo_url: service.photo_url,
            active: Some(service.active),
        }
    }
}

/// Insert payload for `feedbacks`. Approval is left to the schema default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub client_name: String,
    pub text: String,
    pub rating: u8,
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Preencha todos os campos obrigatórios")]
    IncompleteService,
    #[error("Escolha uma nota e preencha seu nome e comentário")]
    IncompleteFeedback,
    #[error("Formato inválido. Use JPG, PNG ou WEBP")]
    InvalidImageType,
    #[error("Arquivo muito grande. Máximo 5MB")]
    ImageTooLarge,
}

/// Raw service form fields as submitted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
}

impl ServiceForm {
    /// Validate and convert into an insert payload with `active = true`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteService`] on any failed field rule.
    pub fn validate(&self) -> Result<NewService, ValidationError> {
        let title = self.title.trim();
        let description = self.description.trim();
        if !TITLE_LEN.contains(&title.chars().count()) || !DESCRIPTION_LEN.contains(&description.chars().count()) {
            return Err(ValidationError::IncompleteService);
        }
        let price = parse_price(&self.price).ok_or(ValidationError::IncompleteService)?;

        Ok(NewService {
            title: title.to_owned(),
            description: description.to_owned(),
            price,
            photo_url: None,
            active: true,
        })
    }
}

/// Accepts `120`, `120.5` and the pt-BR `120,50`.
fn parse_price(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|p| valid_price(*p))
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= MIN_PRICE
}

/// Raw feedback form fields as submitted from the landing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub text: String,
}

impl FeedbackForm {
    /// Validate and trim into an insert payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteFeedback`] when the rating is outside
    /// 1..=5 or the name or comment is blank.
    pub fn validate(&self) -> Result<NewFeedback, ValidationError> {
        let rating = self
            .rating
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (1..=MAX_RATING).contains(r))
            .ok_or(ValidationError::IncompleteFeedback)?;
        let client_name = self.client_name.trim();
        let text = self.text.trim();
        if client_name.is_empty() || text.is_empty() {
            return Err(ValidationError::IncompleteFeedback);
        }
        Ok(NewFeedback { client_name: client_name.to_owned(), text: text.to_owned(), rating })
    }
}

// =============================================================================
// IMAGE UPLOAD
// =============================================================================

/// An image file received from the dashboard form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check content type and size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidImageType`] or [`ValidationError::ImageTooLarge`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let content_type = self.content_type.trim().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::InvalidImageType);
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge);
        }
        Ok(())
    }

    /// File extension for the stored object name. Anything but a plain
    /// alphanumeric suffix falls back to the content type.
    #[must_use]
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() && ext.len() <= 8 && ext.bytes().all(|b| b.is_ascii_alphanumeric()) => {
                ext.to_ascii_lowercase()
            }
            _ => match self.content_type.trim().to_ascii_lowercase().as_str() {
                "image/png" => "png".into(),
                "image/webp" => "webp".into(),
                _ => "jpg".into(),
            },
        }
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
