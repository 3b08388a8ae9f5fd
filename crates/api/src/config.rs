//! Environment-driven server configuration.
//!
//! Every setting is read once at startup by [`ServerConfig::from_env`]. A
//! malformed value is reported as a [`ConfigError`] naming the variable so the
//! binary can exit before binding a socket.
//!
//! | Env Var                | Default                    |
//! |------------------------|----------------------------|
//! | `HOST`                 | `0.0.0.0`                  |
//! | `PORT`                 | `3000`                     |
//! | `DATABASE_URL`         | required                   |
//! | `DB_MAX_CONNECTIONS`   | `20`                       |
//! | `CORS_ORIGINS`         | `http://localhost:5173`    |
//! | `REQUEST_TIMEOUT_SECS` | `30`                       |
//! | `BODY_LIMIT_BYTES`     | `1048576`                  |
//! | `LOG_FORMAT`           | `text` (`json` to switch)  |
//! | `JWT_SECRET`           | required                   |
//! | `JWT_ACCESS_EXPIRY_MINS` | `60`                     |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// A missing or unparsable environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set and non-empty")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Exact origins allowed by CORS. Credentials are allowed, so no wildcard.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on a JSON request body.
    pub body_limit_bytes: usize,
    pub json_logs: bool,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed_or("PORT", DEFAULT_PORT)?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed_or(
                "DB_MAX_CONNECTIONS",
                opsdeck_db::DEFAULT_MAX_CONNECTIONS,
            )?,
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            request_timeout_secs: parsed_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            body_limit_bytes: parsed_or("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            jwt: JwtConfig::from_env()?,
        })
    }

    /// The socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            var: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Read a variable that has no default.
pub(crate) fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Read and parse a variable, falling back to `default` when it is unset.
pub(crate) fn parsed_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
