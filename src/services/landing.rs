//! Data for the public landing page.
//!
//! DESIGN
//! ======
//! Both lists are fetched concurrently. If either fetch fails the page shows
//! built-in sample content for both sections, so a backend outage never
//! leaves visitors with an empty or half-populated page.

use crate::models::{Feedback, Service};
use crate::store::SiteStore;

#[derive(Debug, Clone, PartialEq)]
pub struct LandingData {
    pub services: Vec<Service>,
    pub feedbacks: Vec<Feedback>,
    /// True when the content is the built-in sample set.
    pub sample: bool,
}

/// Active services and approved feedback, or the sample set on failure.
pub async fn load(store: &dyn SiteStore) -> LandingData {
    let (services, feedbacks) = tokio::join!(store.get_services(), store.get_feedbacks());

    match (services, feedbacks) {
        (Ok(services), Ok(feedbacks)) => LandingData { services, feedbacks, sample: false },
        (services, feedbacks) => {
            let error = services.err().or(feedbacks.err()).map(|e| e.to_string()).unwrap_or_default();
            tracing::warn!(%error, "landing data unavailable; showing sample content");
            sample_data()
        }
    }
}

#[must_use]
pub fn sample_data() -> LandingData {
    LandingData { services: sample_services(), feedbacks: sample_feedbacks(), sample: true }
}

fn sample_services() -> Vec<Service> {
    [
        ("Instalação Elétrica", "Troca de chuveiros, tomadas, disjuntores e instalação de luminárias.", 120.0),
        ("Hidráulica Simples", "Reparo de vazamentos em pias, troca de torneiras e sifões.", 100.0),
        ("Montagem de Móveis", "Montagem e desmontagem de guarda-roupas, armários e estantes.", 80.0),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, description, price), id)| Service {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        price,
        photo_url: None,
        active: true,
        created_at: None,
        updated_at: None,
    })
    .collect()
}

fn sample_feedbacks() -> Vec<Feedback> {
    [
        ("Maria Silva", 5, "O serviço foi excelente, montou meu guarda-roupa super rápido e deixou tudo limpo."),
        ("João Paulo", 4, "Ótimo profissional, resolveu o vazamento da pia que ninguém conseguia."),
    ]
    .into_iter()
    .zip(1..)
    .map(|((client_name, rating, text), id)| Feedback {
        id,
        client_name: client_name.to_owned(),
        text: text.to_owned(),
        rating,
        is_approved: true,
        created_at: None,
    })
    .collect()
}

#[cfg(test)]
#[path = "landing_test.rs"]
mod tests;
