//! Health endpoint reporting store connectivity.
//!
//! `GET /health` performs a single round trip through the
//! [`StoreHealthProbe`](crate::domain::ports::StoreHealthProbe) port. The
//! payload shape differs from the error envelope on purpose so load
//! balancers can read `status` directly.

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::StoreHealthError;
use crate::inbound::http::state::HttpState;
use crate::middleware::DiagnosticMode;

const REDACTED_PROBE_ERROR: &str = "database unavailable";

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HealthStatus {
    /// Store answered the probe.
    #[serde(rename = "OK")]
    Ok,
    /// Store did not answer.
    #[serde(rename = "error")]
    Error,
}

/// Store connectivity as observed by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    /// Probe succeeded.
    Connected,
    /// Probe failed.
    Disconnected,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// Store connectivity.
    pub database: DatabaseState,
    /// Store clock reading; present when connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Probe failure; present when disconnected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// Report for a successful probe.
    pub fn connected(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Ok,
            database: DatabaseState::Connected,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    /// Report for a failed probe; the raw message is only kept in
    /// diagnostic mode.
    pub fn disconnected(error: &StoreHealthError, mode: DiagnosticMode) -> Self {
        let message = if mode.is_enabled() {
            match error {
                StoreHealthError::Unavailable { message } => message.clone(),
            }
        } else {
            REDACTED_PROBE_ERROR.to_owned()
        };
        Self {
            status: HealthStatus::Error,
            database: DatabaseState::Disconnected,
            timestamp: None,
            error: Some(message),
        }
    }
}

/// Probe the store and report connectivity.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthReport),
        (status = 500, description = "Store unreachable", body = HealthReport)
    ),
    tags = ["health"],
    operation_id = "healthCheck"
)]
#[get("/health")]
pub async fn health_check(state: web::Data<HttpState>) -> HttpResponse {
    let (mut response, report) = match state.store_health.probe().await {
        Ok(timestamp) => (HttpResponse::Ok(), HealthReport::connected(timestamp)),
        Err(error) => {
            warn!(%error, "store health probe failed");
            (
                HttpResponse::InternalServerError(),
                HealthReport::disconnected(&error, DiagnosticMode::current()),
            )
        }
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}
