//! Middleware scoping the diagnostic mode used when rendering errors.
//!
//! Error rendering happens inside `ResponseError::error_response`, which has
//! no access to application state. The mode is therefore placed in
//! task-local storage for the duration of each request, the same way
//! [`crate::domain::TraceId`] is. Outside a scope the mode is
//! [`DiagnosticMode::Disabled`].

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;

task_local! {
    static DIAGNOSTIC_MODE: DiagnosticMode;
}

/// Whether error responses may carry diagnostic details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticMode {
    /// Details and internal messages are rendered to clients.
    Enabled,
    /// Details are stripped and internal errors redacted.
    #[default]
    Disabled,
}

impl DiagnosticMode {
    /// Mode in effect for the current request.
    #[must_use]
    pub fn current() -> Self {
        DIAGNOSTIC_MODE.try_with(|mode| *mode).unwrap_or_default()
    }

    /// Whether details should be rendered.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Run `fut` with this mode in scope.
    pub async fn scope<Fut>(self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        DIAGNOSTIC_MODE.scope(self, fut).await
    }
}

/// Middleware placing a fixed [`DiagnosticMode`] in scope for each request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::middleware::{DiagnosticMode, Diagnostics};
///
/// let app = App::new().wrap(Diagnostics::new(DiagnosticMode::Enabled));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    mode: DiagnosticMode,
}

impl Diagnostics {
    /// Create the middleware for the given mode.
    #[must_use]
    pub fn new(mode: DiagnosticMode) -> Self {
        Self { mode }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Diagnostics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = DiagnosticsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DiagnosticsMiddleware {
            service,
            mode: self.mode,
        }))
    }
}

/// Service wrapper produced by [`Diagnostics`].
pub struct DiagnosticsMiddleware<S> {
    service: S,
    mode: DiagnosticMode,
}

impl<S, B> Service<ServiceRequest> for DiagnosticsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(self.mode.scope(fut))
    }
}
