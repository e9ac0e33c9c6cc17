use super::*;
use crate::models::ValidationError;
use crate::routes::test_http::{body_json, json_request, send};
use crate::state::test_helpers::{ACCESS_TOKEN, IMAGE_BASE, test_app_state};
use crate::supabase::SupabaseError;
use serde_json::json;
use std::sync::atomic::Ordering;

// =============================================================================
// store_error_to_status
// =============================================================================

#[test]
fn store_errors_map_to_statuses() {
    assert_eq!(
        store_error_to_status(&StoreError::Validation(ValidationError::IncompleteService)),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(store_error_to_status(&StoreError::NotFound("Serviço")), StatusCode::NOT_FOUND);
    assert_eq!(store_error_to_status(&StoreError::Unauthorized), StatusCode::UNAUTHORIZED);
    assert_eq!(
        store_error_to_status(&StoreError::Backend { context: "x", source: SupabaseError::Request("down".into()) }),
        StatusCode::BAD_GATEWAY
    );
}

// =============================================================================
// public
// =============================================================================

#[tokio::test]
async fn public_lists_hide_inactive_and_pending() {
    let (state, store) = test_app_state();
    store.seed_service("Visível", 10.0, true, None);
    store.seed_service("Oculto", 10.0, false, None);
    store.seed_feedback("Ana", 5, true);
    store.seed_feedback("Bia", 5, false);

    let services = body_json(send(&state, json_request("GET", "/api/services", None, None)).await).await;
    let feedbacks = body_json(send(&state, json_request("GET", "/api/feedbacks", None, None)).await).await;

    assert_eq!(services.as_array().unwrap().len(), 1);
    assert_eq!(services[0]["title"], "Visível");
    assert_eq!(feedbacks.as_array().unwrap().len(), 1);
    assert_eq!(feedbacks[0]["client_name"], "Ana");
}

#[tokio::test]
async fn public_list_surfaces_backend_outage() {
    let (state, store) = test_app_state();
    store.offline.store(true, Ordering::SeqCst);

    let response = send(&state, json_request("GET", "/api/services", None, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(response).await["error"].as_str().unwrap().starts_with("Erro ao buscar serviços"));
}

#[tokio::test]
async fn feedback_submission_is_created_pending() {
    let (state, _) = test_app_state();
    let body = json!({ "client_name": "  Rui ", "text": "Rápido e caprichoso", "rating": 5 });

    let response = send(&state, json_request("POST", "/api/feedbacks", Some(body), None)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["client_name"], "Rui");
    assert_eq!(json["is_approved"], false);
}

#[tokio::test]
async fn feedback_with_bad_rating_is_422() {
    let (state, store) = test_app_state();
    let body = json!({ "client_name": "Rui", "text": "Ok", "rating": 9 });

    let response = send(&state, json_request("POST", "/api/feedbacks", Some(body), None)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn feedback_with_unrepresentable_rating_gets_json_error() {
    let (state, store) = test_app_state();

    for rating in [json!(300), json!("cinco"), json!(-1), json!(4.5), serde_json::Value::Null] {
        let body = json!({ "client_name": "Rui", "text": "Ok", "rating": rating });
        let response = send(&state, json_request("POST", "/api/feedbacks", Some(body), None)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "rating {rating}");
        assert_eq!(body_json(response).await["error"], ValidationError::IncompleteFeedback.to_string());
    }
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn feedback_rating_may_be_a_numeric_string() {
    let (state, _) = test_app_state();
    let body = json!({ "client_name": "Rui", "text": "Ok", "rating": "4" });

    let response = send(&state, json_request("POST", "/api/feedbacks", Some(body), None)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["rating"], 4);
}

// =============================================================================
// admin services
// =============================================================================

#[tokio::test]
async fn admin_sees_inactive_services() {
    let (state, store) = test_app_state();
    store.seed_service("Ativo", 10.0, true, None);
    store.seed_service("Inativo", 10.0, false, None);

    let response = send(&state, json_request("GET", "/api/admin/services", None, Some(ACCESS_TOKEN))).await;

    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_creates_service() {
    let (state, store) = test_app_state();
    let body = json!({ "title": "Jardinagem", "description": "Poda e limpeza de jardins.", "price": 90.0 });

    let response = send(&state, json_request("POST", "/api/admin/services", Some(body), Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["active"], true);
    assert!(store.service(json["id"].as_i64().unwrap()).is_some());
}

#[tokio::test]
async fn admin_create_rejects_out_of_range_price() {
    let (state, store) = test_app_state();
    let body = json!({ "title": "Jardinagem", "description": "Poda e limpeza de jardins.", "price": 0.0 });

    let response = send(&state, json_request("POST", "/api/admin/services", Some(body), Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn admin_create_stores_trimmed_text() {
    let (state, store) = test_app_state();
    let body = json!({ "title": "   Pintura   ", "description": "  Pintura de paredes.  ", "price": 300.0 });

    let response = send(&state, json_request("POST", "/api/admin/services", Some(body), Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();
    let stored = store.service(id).unwrap();
    assert_eq!(stored.title, "Pintura");
    assert_eq!(stored.description, "Pintura de paredes.");
}

#[tokio::test]
async fn admin_patch_stores_trimmed_title() {
    let (state, store) = test_app_state();
    let id = store.seed_service("Pintura", 300.0, true, None);
    let uri = format!("/api/admin/services/{id}");

    let response = send(&state, json_request("PATCH", &uri, Some(json!({ "title": "  Reforma  " })), Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.service(id).unwrap().title, "Reforma");
}

#[tokio::test]
async fn admin_gets_single_service_or_404() {
    let (state, store) = test_app_state();
    let id = store.seed_service("Jardinagem", 90.0, false, None);

    let found = send(&state, json_request("GET", &format!("/api/admin/services/{id}"), None, Some(ACCESS_TOKEN))).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["title"], "Jardinagem");

    let missing = send(&state, json_request("GET", "/api/admin/services/9999", None, Some(ACCESS_TOKEN))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["error"], "Serviço não encontrado");
}

#[tokio::test]
async fn admin_patch_touches_only_given_fields() {
    let (state, store) = test_app_state();
    let id = store.seed_service("Jardinagem", 90.0, true, None);

    let response = send(
        &state,
        json_request("PATCH", &format!("/api/admin/services/{id}"), Some(json!({ "price": 120.0 })), Some(ACCESS_TOKEN)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let service = store.service(id).unwrap();
    assert_eq!(service.title, "Jardinagem");
    assert!((service.price - 120.0).abs() < f64::EPSILON);
    assert!(service.active);
}

#[tokio::test]
async fn admin_delete_is_soft_by_default() {
    let (state, store) = test_app_state();
    let id = store.seed_service("Jardinagem", 90.0, true, None);

    let response = send(&state, json_request("DELETE", &format!("/api/admin/services/{id}"), None, Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!store.service(id).unwrap().active);
}

#[tokio::test]
async fn admin_hard_delete_removes_row_and_image() {
    let (state, store) = test_app_state();
    let photo = format!("{IMAGE_BASE}services/j.png");
    let id = store.seed_service("Jardinagem", 90.0, true, Some(&photo));

    let uri = format!("/api/admin/services/{id}?hard=true");
    let response = send(&state, json_request("DELETE", &uri, None, Some(ACCESS_TOKEN))).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.service(id).is_none());
    assert!(store.images.lock().unwrap().is_empty());
}

// =============================================================================
// admin feedback
// =============================================================================

#[tokio::test]
async fn admin_lists_pending_feedback() {
    let (state, store) = test_app_state();
    store.seed_feedback("Ana", 5, true);
    store.seed_feedback("Bia", 2, false);

    let response = send(&state, json_request("GET", "/api/admin/feedbacks", None, Some(ACCESS_TOKEN))).await;

    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_moderates_and_deletes_feedback() {
    let (state, store) = test_app_state();
    let id = store.seed_feedback("Bia", 2, false);
    let uri = format!("/api/admin/feedbacks/{id}");

    let response = send(&state, json_request("PATCH", &uri, Some(json!({ "approved": true })), Some(ACCESS_TOKEN))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_approved"], true);

    let response = send(&state, json_request("DELETE", &uri, None, Some(ACCESS_TOKEN))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.feedback(id).is_none());
}

#[tokio::test]
async fn moderating_unknown_feedback_is_404() {
    let (state, _) = test_app_state();
    let response = send(
        &state,
        json_request("PATCH", "/api/admin/feedbacks/777", Some(json!({ "approved": true })), Some(ACCESS_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
