//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User accounts.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Store-assigned serial identifier.
        id -> Int4,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Unique email address (max 100 characters).
        email -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, refreshed on every update.
        updated_at -> Timestamptz,
    }
}
