//! Runtime configuration loaded from environment variables.
//!
//! | Env Var                            | Default            |
//! |------------------------------------|--------------------|
//! | `DATABASE_URL`                     | required           |
//! | `TASKFLOW_POOL_MAX_SIZE`           | `10`               |
//! | `TASKFLOW_KEY_ALLOCATION_ATTEMPTS` | `5`                |
//! | `TASKFLOW_TICKET_EXCHANGE`         | `taskflow.tickets` |
//! | `TASKFLOW_LOG_FORMAT`              | `pretty`           |

use crate::telemetry::LogFormat;
use std::num::NonZeroU32;
use thiserror::Error;

/// Variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Variable holding the connection pool size.
pub const POOL_MAX_SIZE_VAR: &str = "TASKFLOW_POOL_MAX_SIZE";
/// Variable holding the ticket key allocation retry budget.
pub const KEY_ALLOCATION_ATTEMPTS_VAR: &str = "TASKFLOW_KEY_ALLOCATION_ATTEMPTS";
/// Variable holding the notification exchange name.
pub const TICKET_EXCHANGE_VAR: &str = "TASKFLOW_TICKET_EXCHANGE";
/// Variable selecting the log output format.
pub const LOG_FORMAT_VAR: &str = "TASKFLOW_LOG_FORMAT";

const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_KEY_ALLOCATION_ATTEMPTS: u32 = 5;
const DEFAULT_TICKET_EXCHANGE: &str = "taskflow.tickets";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set or is blank.
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set to a value that cannot be used.
    #[error("environment variable {name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Rejected raw value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub pool_max_size: NonZeroU32,
    /// How many times ticket creation retries after a key conflict.
    pub key_allocation_attempts: NonZeroU32,
    /// Exchange that ticket lifecycle notifications are published to.
    pub ticket_exchange: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl TrackerConfig {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is missing or any variable
    /// holds an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Absence of a .env file is the normal production case.
        let _dotenv = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is missing or any variable
    /// holds an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(DATABASE_URL_VAR).ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        let pool_max_size = parse_positive(
            POOL_MAX_SIZE_VAR,
            read(POOL_MAX_SIZE_VAR),
            DEFAULT_POOL_MAX_SIZE,
        )?;
        let key_allocation_attempts = parse_positive(
            KEY_ALLOCATION_ATTEMPTS_VAR,
            read(KEY_ALLOCATION_ATTEMPTS_VAR),
            DEFAULT_KEY_ALLOCATION_ATTEMPTS,
        )?;
        let ticket_exchange =
            read(TICKET_EXCHANGE_VAR).unwrap_or_else(|| DEFAULT_TICKET_EXCHANGE.to_owned());
        let log_format = match read(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(value) => LogFormat::try_from(value.as_str()).map_err(|_| ConfigError::Invalid {
                name: LOG_FORMAT_VAR,
                value,
                reason: "expected 'pretty' or 'json'",
            })?,
        };

        Ok(Self {
            database_url,
            pool_max_size,
            key_allocation_attempts,
            ticket_exchange,
            log_format,
        })
    }
}

fn parse_positive(
    name: &'static str,
    raw: Option<String>,
    default: u32,
) -> Result<NonZeroU32, ConfigError> {
    let Some(value) = raw else {
        return NonZeroU32::new(default).ok_or_else(|| ConfigError::Invalid {
            name,
            value: default.to_string(),
            reason: "default must be positive",
        });
    };
    value
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ConfigError::Invalid {
            name,
            value,
            reason: "expected a positive integer",
        })
}
