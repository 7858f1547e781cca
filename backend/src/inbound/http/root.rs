//! Service banner at `/`.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Banner text returned by `GET /`.
pub const BANNER: &str = "Users API (Rust + Actix Web + PostgreSQL)";

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RootMessage {
    /// Service banner.
    #[schema(example = "Users API (Rust + Actix Web + PostgreSQL)")]
    pub message: String,
}

/// Identify the service.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootMessage)),
    tags = ["meta"],
    operation_id = "root"
)]
#[get("/")]
pub async fn index() -> web::Json<RootMessage> {
    web::Json(RootMessage {
        message: BANNER.to_owned(),
    })
}
