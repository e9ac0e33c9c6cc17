//! View models for the server-rendered pages.
//!
//! DESIGN
//! ======
//! Each page has one askama template and one struct that feeds it. Domain
//! rows are turned into display rows here (currency, stars, dates, labels)
//! so templates only print strings and never format or branch on raw data.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::config::SiteConfig;
use crate::format::{format_brl, format_date, stars, whatsapp_link};
use crate::models::{Feedback, MAX_IMAGE_BYTES, Service, ServiceForm};
use crate::routes::flash::Flash;
use crate::services::dashboard::DashboardData;
use crate::services::landing::LandingData;

/// Render a template, or a plain 500 if rendering fails.
pub fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao renderizar página").into_response()
        }
    }
}

// =============================================================================
// LANDING
// =============================================================================

pub struct ServiceCard {
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo_url: Option<String>,
    pub whatsapp_url: String,
}

pub struct FeedbackCard {
    pub client_name: String,
    pub text: String,
    pub stars: String,
    pub date: Option<String>,
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingView {
    pub flash: Option<Flash>,
    pub services: Vec<ServiceCard>,
    pub feedbacks: Vec<FeedbackCard>,
    pub sample: bool,
    pub contact_url: String,
}

impl LandingView {
    #[must_use]
    pub fn new(data: LandingData, flash: Option<Flash>, config: &SiteConfig) -> Self {
        let phone = &config.whatsapp_phone;
        let services = data
            .services
            .into_iter()
            .map(|s| ServiceCard {
                whatsapp_url: whatsapp_link(phone, &s.title),
                price: format_brl(s.price),
                title: s.title,
                description: s.description,
                photo_url: s.photo_url,
            })
            .collect();
        let feedbacks = data
            .feedbacks
            .into_iter()
            .map(|f| FeedbackCard {
                stars: stars(f.rating),
                date: f.created_at.map(|ts| format_date(ts, config.display_utc_offset_hours)),
                client_name: f.client_name,
                text: f.text,
            })
            .collect();

        Self { flash, services, feedbacks, sample: data.sample, contact_url: format!("https://wa.me/{phone}") }
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginView {
    pub flash: Option<Flash>,
    pub email: String,
}

// =============================================================================
// ADMIN
// =============================================================================

pub struct ServiceRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo_url: Option<String>,
    pub active: bool,
    pub status_label: &'static str,
    pub toggle_label: &'static str,
    pub confirm_delete: String,
}

impl ServiceRow {
    fn from_service(service: Service) -> Self {
        Self {
            confirm_delete: format!("Tem certeza que deseja deletar \"{}\"?", service.title),
            id: service.id,
            price: format_brl(service.price),
            title: service.title,
            description: service.description,
            photo_url: service.photo_url,
            active: service.active,
            status_label: if service.active { "Ativo" } else { "Inativo" },
            toggle_label: if service.active { "Desativar" } else { "Ativar" },
        }
    }
}

pub struct FeedbackRow {
    pub id: i64,
    pub client_name: String,
    pub text: String,
    pub stars: String,
    pub approved: bool,
    pub status_label: &'static str,
    pub date: String,
    pub confirm_delete: String,
}

impl FeedbackRow {
    fn from_feedback(feedback: Feedback, utc_offset_hours: i8) -> Self {
        Self {
            confirm_delete: format!("Tem certeza que deseja deletar a avaliação de \"{}\"?", feedback.client_name),
            id: feedback.id,
            stars: stars(feedback.rating),
            approved: feedback.is_approved,
            status_label: if feedback.is_approved { "Aprovada" } else { "Pendente" },
            date: feedback
                .created_at
                .map(|ts| format_date(ts, utc_offset_hours))
                .unwrap_or_default(),
            client_name: feedback.client_name,
            text: feedback.text,
        }
    }
}

/// State of the add/edit service form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFormView {
    pub editing_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub price: String,
    pub photo_url: Option<String>,
}

impl ServiceFormView {
    /// Pre-filled from an existing service for editing.
    #[must_use]
    pub fn editing(service: &Service) -> Self {
        Self {
            editing_id: Some(service.id),
            title: service.title.clone(),
            description: service.description.clone(),
            price: format!("{:.2}", service.price),
            photo_url: service.photo_url.clone(),
        }
    }

    /// Re-shown after a rejected submission, keeping what the admin typed.
    #[must_use]
    pub fn resubmitted(form: &ServiceForm, editing_id: Option<i64>) -> Self {
        Self {
            editing_id,
            title: form.title.clone(),
            description: form.description.clone(),
            price: form.price.clone(),
            photo_url: None,
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminView {
    pub flash: Option<Flash>,
    pub user_email: String,
    pub services: Vec<ServiceRow>,
    pub services_error: Option<String>,
    pub feedbacks: Vec<FeedbackRow>,
    pub feedbacks_error: Option<String>,
    pub pending_count: usize,
    pub form: ServiceFormView,
    pub max_image_mb: usize,
}

impl AdminView {
    /// Build the dashboard. With `edit` set, the form is pre-filled from the
    /// matching loaded service; an unknown id leaves the form empty.
    #[must_use]
    pub fn new(
        data: DashboardData,
        user_email: String,
        flash: Option<Flash>,
        form: Option<ServiceFormView>,
        edit: Option<i64>,
        config: &SiteConfig,
    ) -> Self {
        let pending_count = data.pending_count();

        let (services, services_error) = match data.services {
            Ok(rows) => (rows, None),
            Err(_) => (Vec::new(), Some("Erro ao carregar serviços".to_owned())),
        };
        let form = form.unwrap_or_else(|| {
            edit.and_then(|id| services.iter().find(|s| s.id == id))
                .map(ServiceFormView::editing)
                .unwrap_or_default()
        });

        let (feedbacks, feedbacks_error) = match data.feedbacks {
            Ok(rows) => (
                rows.into_iter()
                    .map(|f| FeedbackRow::from_feedback(f, config.display_utc_offset_hours))
                    .collect(),
                None,
            ),
            Err(_) => (Vec::new(), Some("Erro ao carregar avaliações".to_owned())),
        };

        Self {
            flash,
            user_email,
            services: services.into_iter().map(ServiceRow::from_service).collect(),
            services_error,
            feedbacks,
            feedbacks_error,
            pending_count,
            form,
            max_image_mb: MAX_IMAGE_BYTES / (1024 * 1024),
        }
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
