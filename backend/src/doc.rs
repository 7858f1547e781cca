//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the payload schemas they
//! exchange. The document backs Swagger UI in debug builds and is exported
//! by the `openapi-dump` binary for external tooling.

use utoipa::OpenApi;

use crate::domain::{ErrorCode, User};
use crate::inbound::http::ErrorBody;
use crate::inbound::http::health::{DatabaseState, HealthReport, HealthStatus};
use crate::inbound::http::root::RootMessage;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "CRUD over user records backed by PostgreSQL."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::root::index,
        crate::inbound::http::health::health_check,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(
        User,
        ErrorBody,
        ErrorCode,
        CreateUserRequest,
        UpdateUserRequest,
        HealthReport,
        HealthStatus,
        DatabaseState,
        RootMessage
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "health", description = "Store connectivity"),
        (name = "meta", description = "Service identification")
    )
)]
pub struct ApiDoc;
