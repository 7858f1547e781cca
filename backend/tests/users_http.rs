//! End-to-end behaviour of the users resource over the in-memory store.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

mod support;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};
use users_api::domain::TRACE_ID_HEADER;
use users_api::middleware::DiagnosticMode;
use users_api::test_support::StubStoreHealthProbe;

use support::{dev_app, init_app, send};

fn user_uri(id: i64) -> String {
    format!("/api/users/{id}")
}

/// Create a user and return its id, asserting success.
async fn create<S>(app: &S, name: &str, email: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": name, "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_i64().expect("numeric id")
}

#[rstest]
#[actix_web::test]
async fn create_echoes_fields_and_timestamps() {
    let app = dev_app().await;
    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": "Ada Lovelace", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["id"].as_i64().is_some_and(|id| id > 0));
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[rstest]
#[case(json!({"email": "ada@example.com"}), "name is required")]
#[case(json!({"name": "Ada"}), "email is required")]
#[case(json!({"name": "", "email": "ada@example.com"}), "name is required")]
#[case(json!({"name": "Ada", "email": "ada@"}), "a valid email address is required")]
#[case(json!({"name": "x".repeat(101), "email": "ada@example.com"}), "name must be at most 100 characters")]
#[case(json!({"name": 123, "email": "ada@example.com"}), "name must be a string")]
#[case(json!({"name": "Ada", "email": 42}), "email must be a string")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(#[case] payload: Value, #[case] message: &str) {
    let app = dev_app().await;
    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/users").set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_on_create_is_rejected() {
    let app = dev_app().await;
    create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": "Imposter", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_ERROR");
    assert_eq!(body["message"], "email already registered");
}

#[rstest]
#[actix_web::test]
async fn create_then_get_round_trips() {
    let app = dev_app().await;
    let id = create(&app, "Grace Hopper", "grace@example.com").await;

    let (status, body) = send(&app, TestRequest::get().uri(&user_uri(id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Grace Hopper");
    assert_eq!(body["email"], "grace@example.com");
}

#[rstest]
#[case("1.0")]
#[case("1e0")]
#[case("+1")]
#[actix_web::test]
async fn whole_number_literals_address_the_same_user(#[case] raw: &str) {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;
    assert_eq!(id, 1);

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/api/users/{raw}"))).await;

    assert_eq!(status, StatusCode::OK, "lookup failed: {body}");
    assert_eq!(body["id"], 1);
}

#[rstest]
#[case("/api/users/999", StatusCode::NOT_FOUND, "user not found")]
#[case("/api/users/abc", StatusCode::BAD_REQUEST, "id must be a positive integer")]
#[actix_web::test]
async fn get_reports_missing_and_malformed_ids(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let app = dev_app().await;
    let (actual, body) = send(&app, TestRequest::get().uri(uri)).await;
    assert_eq!(actual, status);
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn list_is_ordered_by_id() {
    let app = dev_app().await;
    let first = create(&app, "Ada", "ada@example.com").await;
    let second = create(&app, "Grace", "grace@example.com").await;

    let (status, body) = send(&app, TestRequest::get().uri("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|user| user["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[rstest]
#[case(json!({"name": "Ada King"}), "Ada King", "ada@example.com")]
#[case(json!({"email": "countess@example.com"}), "Ada", "countess@example.com")]
#[case(json!({"name": "Ada King", "email": "countess@example.com"}), "Ada King", "countess@example.com")]
#[actix_web::test]
async fn patch_changes_only_supplied_fields(
    #[case] payload: Value,
    #[case] name: &str,
    #[case] email: &str,
) {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::patch().uri(&user_uri(id)).set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], name);
    assert_eq!(body["email"], email);
}

#[rstest]
#[actix_web::test]
async fn patch_without_fields_is_rejected() {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::patch().uri(&user_uri(id)).set_json(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "at least one of name or email must be supplied");
}

#[rstest]
#[actix_web::test]
async fn patch_with_mistyped_field_names_the_field() {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::patch().uri(&user_uri(id)).set_json(json!({"email": 42})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email must be a string");
    assert_eq!(body["details"]["field"], "email");
    assert_eq!(body["details"]["code"], "invalid_type");
}

#[rstest]
#[actix_web::test]
async fn patch_to_another_users_email_conflicts() {
    let app = dev_app().await;
    create(&app, "Ada", "ada@example.com").await;
    let grace = create(&app, "Grace", "grace@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::patch()
            .uri(&user_uri(grace))
            .set_json(json!({"email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_ERROR");
}

#[rstest]
#[actix_web::test]
async fn patch_to_own_email_succeeds() {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::patch()
            .uri(&user_uri(id))
            .set_json(json!({"email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");
}

#[rstest]
#[actix_web::test]
async fn patch_of_missing_user_is_not_found() {
    let app = dev_app().await;
    let (status, body) = send(
        &app,
        TestRequest::patch()
            .uri("/api/users/41")
            .set_json(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");
}

#[rstest]
#[actix_web::test]
async fn delete_returns_prior_state_then_user_is_gone() {
    let app = dev_app().await;
    let id = create(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(&app, TestRequest::delete().uri(&user_uri(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");

    let (status, _) = send(&app, TestRequest::get().uri(&user_uri(id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, TestRequest::delete().uri(&user_uri(id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn production_mode_hides_validation_details() {
    let app = init_app(DiagnosticMode::Disabled, StubStoreHealthProbe::healthy()).await;
    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": "Ada"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": "VALIDATION_ERROR", "message": "email is required"}));
}

#[rstest]
#[actix_web::test]
async fn every_response_carries_a_trace_id() {
    let app = dev_app().await;
    for request in [
        TestRequest::get().uri("/api/users"),
        TestRequest::get().uri("/api/users/abc"),
        TestRequest::get().uri("/no/such/route"),
    ] {
        let response = actix_web::test::call_service(&app, request.to_request()).await;
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
    }
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_use_the_error_envelope() {
    let app = dev_app().await;
    let (status, body) = send(&app, TestRequest::get().uri("/api/widgets")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
