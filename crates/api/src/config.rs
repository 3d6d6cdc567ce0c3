//! Environment-driven server configuration.
//!
//! `.env` is loaded by the binary before [`ServerConfig::from_env`] runs.
//!
//! | Env Var                  | Default                 |
//! |--------------------------|-------------------------|
//! | `DATABASE_URL`           | required                |
//! | `HOST`                   | `0.0.0.0`               |
//! | `PORT`                   | `3000`                  |
//! | `CORS_ORIGINS`           | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`   | `30`                    |
//! | `JWT_SECRET`             | required                |
//! | `JWT_ACCESS_EXPIRY_MINS` | `15`                    |

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// A missing or malformed environment variable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Parsed from the comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL", var("DATABASE_URL"))?,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            cors_origins: parse_origins(
                var("CORS_ORIGINS").as_deref().unwrap_or(DEFAULT_CORS_ORIGINS),
            ),
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            jwt: JwtConfig {
                secret: required("JWT_SECRET", var("JWT_SECRET"))?,
                access_token_expiry_mins: parse_or(
                    "JWT_ACCESS_EXPIRY_MINS",
                    var("JWT_ACCESS_EXPIRY_MINS"),
                    DEFAULT_ACCESS_EXPIRY_MINS,
                )?,
            },
        })
    }
}

/// Read a variable, treating blank values as unset.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str, raw: Option<String>) -> Result<String, ConfigError> {
    raw.ok_or(ConfigError::Missing(key))
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
