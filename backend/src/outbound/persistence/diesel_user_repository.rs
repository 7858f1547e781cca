//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every port method is a single statement. Writes use `RETURNING` so the
//! stored row, with its database-assigned id and timestamps, is what flows
//! back to the domain.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserChanges, UserId, UserName};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.message())
}

/// Map Diesel errors to user persistence errors.
///
/// Unique violations keep the constraint name so the domain can tell an
/// email clash from any other duplicate.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::not_found(),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let target = info
                .constraint_name()
                .or_else(|| info.column_name())
                .unwrap_or("unknown");
            UserPersistenceError::unique_violation(target)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => UserPersistenceError::query(info.message()),
        DieselError::QueryBuilderError(err) => UserPersistenceError::query(err.to_string()),
        other => UserPersistenceError::query(other.to_string()),
    }
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        warn!(id = row.id, field = err.field(), "stored user row failed validation");
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let id = UserId::new(row.id).map_err(invalid)?;
    let name = UserName::new(&row.name).map_err(invalid)?;
    let email = EmailAddress::new(&row.email).map_err(invalid)?;
    Ok(User::new(id, name, email, row.created_at, row.updated_at))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            name: changes.name().map(|name| name.as_ref()),
            email: changes.email().map(|email| email.as_ref()),
            updated_at: Utc::now(),
        };

        let row: UserRow = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn delete(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::delete(users::table.filter(users::id.eq(id.get())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }
}
