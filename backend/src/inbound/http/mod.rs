//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod root;
pub mod state;
pub mod users;
mod validation;

pub use error::{ErrorBody, json_error_handler, status_for};
