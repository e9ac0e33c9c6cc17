//! Data for the admin dashboard.
//!
//! Unlike the landing page, each section keeps its own result: a failed
//! feedback fetch shows an error in that section while services still render.

use crate::models::{Feedback, Service};
use crate::store::{SiteStore, StoreError};

pub struct DashboardData {
    pub services: Result<Vec<Service>, StoreError>,
    pub feedbacks: Result<Vec<Feedback>, StoreError>,
}

impl DashboardData {
    /// Number of feedback rows waiting for moderation.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.feedbacks
            .as_ref()
            .map_or(0, |f| f.iter().filter(|f| !f.is_approved).count())
    }

    /// True when either section failed because the session is no longer valid.
    #[must_use]
    pub fn unauthorized(&self) -> bool {
        matches!(self.services, Err(StoreError::Unauthorized)) || matches!(self.feedbacks, Err(StoreError::Unauthorized))
    }
}

/// All services and all feedback, fetched concurrently.
pub async fn load(store: &dyn SiteStore, token: &str) -> DashboardData {
    let (services, feedbacks) = tokio::join!(store.get_all_services(token), store.get_all_feedbacks(token));
    if let Err(e) = &services {
        tracing::error!(error = %e, "dashboard services unavailable");
    }
    if let Err(e) = &feedbacks {
        tracing::error!(error = %e, "dashboard feedback unavailable");
    }
    DashboardData { services, feedbacks }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
