use super::*;
use crate::state::test_helpers::{ACCESS_TOKEN, MemoryStore};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn includes_inactive_services_and_pending_feedback() {
    let store = MemoryStore::new();
    store.seed_service("Elétrica", 120.0, true, None);
    store.seed_service("Pintura", 300.0, false, None);
    store.seed_feedback("Ana", 5, true);
    store.seed_feedback("Bruno", 3, false);
    store.seed_feedback("Clara", 4, false);

    let data = load(&store, ACCESS_TOKEN).await;

    assert_eq!(data.services.as_ref().unwrap().len(), 2);
    assert_eq!(data.feedbacks.as_ref().unwrap().len(), 3);
    assert_eq!(data.pending_count(), 2);
    assert!(!data.unauthorized());
}

#[tokio::test]
async fn stale_token_is_reported() {
    let store = MemoryStore::new();
    let data = load(&store, "stale").await;
    assert!(data.unauthorized());
    assert_eq!(data.pending_count(), 0);
}

#[tokio::test]
async fn backend_failure_is_per_section() {
    let store = MemoryStore::new();
    store.offline.store(true, Ordering::SeqCst);

    let data = load(&store, ACCESS_TOKEN).await;

    assert!(matches!(data.services, Err(StoreError::Backend { .. })));
    assert!(matches!(data.feedbacks, Err(StoreError::Backend { .. })));
    assert!(!data.unauthorized());
}
