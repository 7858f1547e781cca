//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from CLI flags, `APP_*` environment variables or a
//! configuration file. Unset values fall back to the defaults documented on
//! each accessor. The database URL additionally falls back to the
//! conventional `DATABASE_URL` variable.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::middleware::DiagnosticMode;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_MAX_SIZE: u32 = 20;
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_CONNECT_TIMEOUT_MS: u64 = 2000;
const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Neither `APP_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("database URL is not configured; set APP_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// The host does not parse as an IP address.
    #[error("invalid listen host: {value}")]
    InvalidHost {
        /// Rejected host value.
        value: String,
    },
    /// The environment name is not recognised.
    #[error("unknown environment: {value}; expected development, test or production")]
    UnknownEnvironment {
        /// Rejected environment value.
        value: String,
    },
    /// The pool must hold at least one connection.
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Deployment environment; decides whether diagnostics reach clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Local development; diagnostics enabled.
    #[default]
    Development,
    /// Automated tests; diagnostics enabled.
    Test,
    /// Production; diagnostics disabled and internal errors redacted.
    Production,
}

impl RunMode {
    /// Diagnostic mode implied by this environment.
    pub fn diagnostic_mode(self) -> DiagnosticMode {
        match self {
            Self::Production => DiagnosticMode::Disabled,
            Self::Development | Self::Test => DiagnosticMode::Enabled,
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownEnvironment {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// Settings for the HTTP server and its database pool.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Listen address; defaults to `0.0.0.0`.
    pub host: Option<String>,
    /// Listen port; defaults to 3000.
    pub port: Option<u16>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections; defaults to 20.
    pub pool_max_size: Option<u32>,
    /// Seconds an unused connection may stay idle; defaults to 30.
    pub pool_idle_timeout_secs: Option<u64>,
    /// Milliseconds to wait for a pooled connection; defaults to 2000.
    pub pool_connect_timeout_ms: Option<u64>,
    /// `development`, `test` or `production`; defaults to development.
    pub environment: Option<String>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHost`] when the host is not an IP.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::InvalidHost {
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when neither is set.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(FALLBACK_DATABASE_URL_VAR).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Pool configuration derived from the settings.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::database_url`] failures and rejects a zero-sized
    /// pool.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        if max_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(max_size)
            .with_idle_timeout(Duration::from_secs(
                self.pool_idle_timeout_secs
                    .unwrap_or(DEFAULT_POOL_IDLE_TIMEOUT_SECS),
            ))
            .with_connection_timeout(Duration::from_millis(
                self.pool_connect_timeout_ms
                    .unwrap_or(DEFAULT_POOL_CONNECT_TIMEOUT_MS),
            )))
    }

    /// Deployment environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnvironment`] for unrecognised names.
    pub fn run_mode(&self) -> Result<RunMode, ConfigError> {
        self.environment
            .as_deref()
            .map_or(Ok(RunMode::default()), RunMode::from_str)
    }
}
