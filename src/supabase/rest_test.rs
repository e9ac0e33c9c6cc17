use super::*;
use crate::supabase::test_client;

fn header<'a>(request: &'a reqwest::Request, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

fn body_json(request: &reqwest::Request) -> serde_json::Value {
    let bytes = request.body().and_then(reqwest::Body::as_bytes).unwrap();
    serde_json::from_slice(bytes).unwrap()
}

// =============================================================================
// Query
// =============================================================================

#[test]
fn query_params_put_select_first() {
    let params = Query::new().eq("active", true).newest_first().to_params(true);
    assert_eq!(
        params,
        vec![
            ("select".to_owned(), "*".to_owned()),
            ("active".to_owned(), "eq.true".to_owned()),
            ("order".to_owned(), "created_at.desc".to_owned()),
        ]
    );
}

#[test]
fn query_params_without_select_or_order() {
    let params = Query::new().eq("id", 42).to_params(false);
    assert_eq!(params, vec![("id".to_owned(), "eq.42".to_owned())]);
}

#[test]
fn query_ascending_order() {
    let params = Query::new().order("title", true).to_params(false);
    assert_eq!(params, vec![("order".to_owned(), "title.asc".to_owned())]);
}

// =============================================================================
// Request shape
// =============================================================================

#[test]
fn select_request_targets_table_with_filters() {
    let client = test_client();
    let query = Query::new().eq("is_approved", true).newest_first();
    let request = client
        .select_request("feedbacks", &query, false, None)
        .build()
        .unwrap();

    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url().path(), "/rest/v1/feedbacks");
    assert_eq!(request.url().query(), Some("select=*&is_approved=eq.true&order=created_at.desc"));
    assert_eq!(header(&request, "apikey"), Some("anon-key"));
    assert_eq!(header(&request, "authorization"), Some("Bearer anon-key"));
    assert!(header(&request, "accept").is_none());
}

#[test]
fn select_single_asks_for_object() {
    let client = test_client();
    let request = client
        .select_request("services", &Query::new().eq("id", 3), true, Some("user-jwt"))
        .build()
        .unwrap();

    assert_eq!(header(&request, "accept"), Some("application/vnd.pgrst.object+json"));
    assert_eq!(header(&request, "authorization"), Some("Bearer user-jwt"));
    assert_eq!(header(&request, "apikey"), Some("anon-key"));
}

#[test]
fn insert_request_wraps_row_in_array() {
    let client = test_client();
    let row = serde_json::json!({ "client_name": "Maria", "text": "Ótimo", "rating": 5 });
    let request = client
        .insert_request("feedbacks", &row, None)
        .build()
        .unwrap();

    assert_eq!(request.method(), &Method::POST);
    assert_eq!(request.url().path(), "/rest/v1/feedbacks");
    assert_eq!(header(&request, "prefer"), Some("return=representation"));
    assert_eq!(body_json(&request), serde_json::json!([row]));
}

#[test]
fn update_request_filters_by_id() {
    let client = test_client();
    let patch = serde_json::json!({ "is_approved": true });
    let request = client
        .update_request("feedbacks", &Query::new().eq("id", 9), &patch, Some("jwt"))
        .build()
        .unwrap();

    assert_eq!(request.method(), &Method::PATCH);
    assert_eq!(request.url().query(), Some("select=*&id=eq.9"));
    assert_eq!(body_json(&request), patch);
    assert_eq!(header(&request, "accept"), Some("application/vnd.pgrst.object+json"));
}

#[test]
fn delete_request_has_no_select() {
    let client = test_client();
    let request = client
        .delete_request("services", &Query::new().eq("id", 4), Some("jwt"))
        .build()
        .unwrap();

    assert_eq!(request.method(), &Method::DELETE);
    assert_eq!(request.url().query(), Some("id=eq.4"));
}
