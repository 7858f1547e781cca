//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::health::health_check;
use crate::inbound::http::json_error_handler;
use crate::inbound::http::root::index;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;
use crate::middleware::{DiagnosticMode, Diagnostics, Trace};
use crate::outbound::persistence::{DbPool, DieselStoreHealthProbe, DieselUserRepository};

/// Wire HTTP state to the PostgreSQL adapters.
pub fn build_http_state(pool: &DbPool) -> HttpState {
    HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselStoreHealthProbe::new(pool.clone())),
    )
}

async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("route not found"))
}

/// Assemble the application: middleware, JSON limits and every route.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::web;
/// use users_api::inbound::http::state::HttpState;
/// use users_api::middleware::DiagnosticMode;
/// use users_api::server::build_app;
/// use users_api::test_support::{InMemoryUserRepository, StubStoreHealthProbe};
///
/// let state = web::Data::new(HttpState::new(
///     Arc::new(InMemoryUserRepository::default()),
///     Arc::new(StubStoreHealthProbe::healthy()),
/// ));
/// let app = build_app(state, DiagnosticMode::Enabled);
/// # let _ = app;
/// ```
pub fn build_app(
    http_state: web::Data<HttpState>,
    diagnostics: DiagnosticMode,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api").configure(users::configure);

    let app = App::new()
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Diagnostics::new(diagnostics))
        .wrap(Trace)
        .service(index)
        .service(health_check)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(route_not_found))
}

/// Construct an Actix HTTP server for the given configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        diagnostics,
    } = config;
    let http_state = web::Data::new(build_http_state(&db_pool));

    let server = HttpServer::new(move || build_app(http_state.clone(), diagnostics))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, ?diagnostics, "listening");
    Ok(server)
}
