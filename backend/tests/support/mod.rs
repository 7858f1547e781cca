//! Shared harness for HTTP integration tests.
//!
//! Builds the production application from `users_api::server::build_app`
//! over the in-memory store so every middleware and route is exercised.

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use serde_json::Value;
use users_api::domain::ports::StoreHealthProbe;
use users_api::inbound::http::state::HttpState;
use users_api::middleware::DiagnosticMode;
use users_api::server::build_app;
use users_api::test_support::{InMemoryUserRepository, StubStoreHealthProbe};

/// Initialise the full application over an empty store.
pub async fn init_app(
    mode: DiagnosticMode,
    probe: impl StoreHealthProbe + 'static,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = web::Data::new(HttpState::new(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(probe),
    ));
    test::init_service(build_app(state, mode)).await
}

/// Application with diagnostics enabled and a healthy store.
pub async fn dev_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    init_app(DiagnosticMode::Enabled, StubStoreHealthProbe::healthy()).await
}

/// Issue `request` and decode the JSON body.
pub async fn send<S>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).expect("json body"))
}
