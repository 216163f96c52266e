// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup (a `.env` file is
//! honoured by the binary). Any invalid or missing required value aborts
//! startup; nothing here is re-read per request.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `BCRYPT_COST` | bcrypt cost factor for password hashes | `10` |
//! | `GATE_LOOKUP_TIMEOUT_MS` | Upper bound for repository reads inside auth gates | `5000` |
//! | `CORS_ORIGIN` | Allowed CORS origin | permissive |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use thiserror::Error;

use crate::auth::password::DEFAULT_BCRYPT_COST;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const GATE_LOOKUP_TIMEOUT_ENV: &str = "GATE_LOOKUP_TIMEOUT_MS";
pub const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GATE_LOOKUP_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),
    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub gate_lookup_timeout: Duration,
    pub cors_origin: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::MissingVar(JWT_SECRET_ENV))?;

        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;

        let bcrypt_cost = parse_or(get(BCRYPT_COST_ENV), BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidVar {
                name: BCRYPT_COST_ENV,
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31".to_string(),
            });
        }

        let timeout_ms = parse_or(
            get(GATE_LOOKUP_TIMEOUT_ENV),
            GATE_LOOKUP_TIMEOUT_ENV,
            DEFAULT_GATE_LOOKUP_TIMEOUT_MS,
        )?;

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_lowercase) {
            None => LogFormat::default(),
            Some(ref v) if v == "json" => LogFormat::Json,
            Some(ref v) if v == "pretty" => LogFormat::Pretty,
            Some(v) => {
                return Err(ConfigError::InvalidVar {
                    name: LOG_FORMAT_ENV,
                    value: v,
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            bcrypt_cost,
            gate_lookup_timeout: Duration::from_millis(timeout_ms),
            cors_origin: get(CORS_ORIGIN_ENV),
            log_format,
        })
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn missing_secret_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVar(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "  ")]),
            Err(ConfigError::MissingVar(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[(JWT_SECRET_ENV, "secret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.gate_lookup_timeout, Duration::from_millis(5000));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (JWT_SECRET_ENV, "secret"),
            (PORT_ENV, "3000"),
            (BCRYPT_COST_ENV, "12"),
            (GATE_LOOKUP_TIMEOUT_ENV, "250"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.gate_lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "http")]),
            Err(ConfigError::InvalidVar { name: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (BCRYPT_COST_ENV, "40")]),
            Err(ConfigError::InvalidVar { name: BCRYPT_COST_ENV, .. })
        ));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (LOG_FORMAT_ENV, "xml")]),
            Err(ConfigError::InvalidVar { name: LOG_FORMAT_ENV, .. })
        ));
    }
}
