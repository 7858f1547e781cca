//! Tests for users API handlers.

use super::*;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{MockUserRepository, UserPersistenceError};
use crate::domain::{EmailAddress, UserName};
use crate::inbound::http::json_error_handler;
use crate::middleware::{DiagnosticMode, Diagnostics, Trace};
use crate::test_support::StubStoreHealthProbe;

fn sample_user(id: i32) -> User {
    let at = Utc
        .with_ymd_and_hms(2025, 1, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    User::new(
        UserId::new(id).expect("valid id"),
        UserName::new("Ada Lovelace").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        at,
        at,
    )
}

async fn call(
    repo: MockUserRepository,
    mode: DiagnosticMode,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let state = web::Data::new(HttpState::new(
        Arc::new(repo),
        Arc::new(StubStoreHealthProbe::healthy()),
    ));
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Diagnostics::new(mode))
            .wrap(Trace)
            .service(web::scope("/api").configure(configure)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn list_serialises_users_in_camel_case() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .times(1)
        .return_once(|| Ok(vec![sample_user(1), sample_user(2)]));

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::get().uri("/api/users"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.get(0),
        Some(&json!({
            "id": 1,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "createdAt": "2025-01-01T09:30:00Z",
            "updatedAt": "2025-01-01T09:30:00Z"
        }))
    );
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case("abc")]
#[case("0")]
#[case("-1")]
#[case("2.5")]
#[actix_web::test]
async fn invalid_ids_never_reach_the_store(#[case] raw: &str) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::get().uri(&format!("/api/users/{raw}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "id must be a positive integer");
    assert_eq!(body["details"]["field"], "id");
}

#[rstest]
#[actix_web::test]
async fn bad_id_wins_over_bad_body() {
    let mut repo = MockUserRepository::new();
    repo.expect_update().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::patch()
            .uri("/api/users/abc")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "id must be a positive integer");
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_a_validation_error() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\":"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "request body must be a JSON object");
}

#[rstest]
#[actix_web::test]
async fn missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(UserId::new(42).expect("valid id")))
        .times(1)
        .return_once(|_| Ok(None));

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::get().uri("/api/users/42"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": "NOT_FOUND", "message": "user not found"}));
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_record() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .withf(|user| user.name.as_ref() == "Ada Lovelace" && user.email.as_ref() == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(sample_user(7)));

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": " Ada Lovelace ", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 7);
}

#[rstest]
#[case(DiagnosticMode::Enabled, "email already registered", true)]
#[case(DiagnosticMode::Disabled, "email already registered", false)]
#[actix_web::test]
async fn duplicate_email_is_reported(
    #[case] mode: DiagnosticMode,
    #[case] message: &str,
    #[case] has_details: bool,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::unique_violation("users_email_key")));

    let (status, body) = call(
        repo,
        mode,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_ERROR");
    assert_eq!(body["message"], message);
    assert_eq!(body.get("details").is_some(), has_details);
}

#[rstest]
#[case(DiagnosticMode::Enabled, "database operation failed", true)]
#[case(DiagnosticMode::Disabled, "internal server error", false)]
#[actix_web::test]
async fn store_failures_are_internal_errors(
    #[case] mode: DiagnosticMode,
    #[case] message: &str,
    #[case] has_details: bool,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .times(1)
        .return_once(|| Err(UserPersistenceError::connection("connection refused")));

    let (status, body) = call(
        repo,
        mode,
        actix_test::TestRequest::get().uri("/api/users"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["message"], message);
    assert_eq!(body.get("details").is_some(), has_details);
}

#[rstest]
#[actix_web::test]
async fn update_passes_only_supplied_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(|id, changes| {
            id.get() == 3
                && changes.name().is_none()
                && changes.email().map(|email| email.as_ref()) == Some("new@example.com")
        })
        .times(1)
        .return_once(|_, _| Ok(sample_user(3)));

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::patch()
            .uri("/api/users/3")
            .set_json(json!({"email": "new@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
}

#[rstest]
#[actix_web::test]
async fn empty_update_is_rejected_before_the_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_update().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::patch()
            .uri("/api/users/3")
            .set_json(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "at least one of name or email must be supplied");
}

#[rstest]
#[actix_web::test]
async fn delete_of_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::not_found()));

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::delete().uri("/api/users/9"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");
}

#[rstest]
#[case(json!({"name": 123, "email": "b@example.com"}), "name must be a string", "name")]
#[case(json!({"name": "Ada", "email": ["b@example.com"]}), "email must be a string", "email")]
#[actix_web::test]
async fn create_reports_mistyped_fields_by_name(
    #[case] payload: Value,
    #[case] message: &str,
    #[case] field: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::post().uri("/api/users").set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], message);
    assert_eq!(body["details"], json!({"field": field, "code": "invalid_type"}));
}

#[rstest]
#[actix_web::test]
async fn update_reports_mistyped_fields_by_name() {
    let mut repo = MockUserRepository::new();
    repo.expect_update().never();

    let (status, body) = call(
        repo,
        DiagnosticMode::Enabled,
        actix_test::TestRequest::patch()
            .uri("/api/users/1")
            .set_json(json!({"email": 42})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email must be a string");
    assert_eq!(body["details"]["field"], "email");
}
