//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users       {"name":"Ada","email":"ada@example.com"}
//! PATCH  /api/users/{id}  {"email":"ada@lovelace.dev"}
//! DELETE /api/users/{id}
//! ```

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ApiResult, Error, User, UserId};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_user_id, validate_create, validate_update};

/// Body for `POST /api/users`.
///
/// Fields are held as raw JSON so a missing or wrongly typed field is
/// reported against that field rather than as a body parse failure.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    /// Display name, 1 to 100 characters after trimming.
    #[schema(value_type = String, example = "Ada Lovelace")]
    pub name: Option<Value>,
    /// Unique email address.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Option<Value>,
}

/// Body for `PATCH /api/users/{id}`; at least one field must be present.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    /// Replacement display name.
    #[schema(value_type = Option<String>, example = "Ada King")]
    pub name: Option<Value>,
    /// Replacement email address.
    #[schema(value_type = Option<String>, example = "ada@lovelace.dev")]
    pub email: Option<Value>,
}

/// Validated `{id}` route segment.
///
/// Extracted ahead of any body so a bad id wins over a bad payload.
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

impl FromRequest for UserIdPath {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(parse_user_id(raw).map(Self))
    }
}

/// List every user ordered by id.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(web::Json(users))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "Positive user id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<web::Json<User>> {
    let user = state.users.get(id).await?;
    Ok(web::Json(user))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid payload or duplicate email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest { name, email } = payload.into_inner();
    let new_user = validate_create(name, email)?;
    let user = state.users.create(new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "Positive user id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid id, payload or duplicate email", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    UserIdPath(id): UserIdPath,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let UpdateUserRequest { name, email } = payload.into_inner();
    let changes = validate_update(name, email)?;
    let user = state.users.update(id, changes).await?;
    Ok(web::Json(user))
}

/// Delete a user and return its last state.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "Positive user id")),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<web::Json<User>> {
    let user = state.users.delete(id).await?;
    Ok(web::Json(user))
}

/// Register the user routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
