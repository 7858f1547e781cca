//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user store and health probe using
//!   Diesel.

pub mod persistence;
