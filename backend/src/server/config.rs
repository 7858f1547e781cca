//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::middleware::DiagnosticMode;
use crate::outbound::persistence::DbPool;

/// Everything [`create_server`](super::create_server) needs to start
/// listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) diagnostics: DiagnosticMode,
}

impl ServerConfig {
    /// Configuration serving `db_pool` on `bind_addr` with diagnostics off.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            diagnostics: DiagnosticMode::Disabled,
        }
    }

    /// Choose whether error responses carry diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticMode) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the configured diagnostic mode.
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticMode {
        self.diagnostics
    }
}
