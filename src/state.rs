//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the data-access store behind a trait object and the parsed site
//! configuration. There is no local copy of any record: the remote backend
//! is the only source of truth.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::store::SiteStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SiteStore>,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn SiteStore>, config: SiteConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
