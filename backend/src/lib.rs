//! Users API library: domain, adapters and server wiring.
//!
//! The binary in `main.rs` only loads settings and starts the server built
//! here, so integration tests can drive the same application in-process.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
