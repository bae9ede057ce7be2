//! Records configuration loaded from the environment.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, NamingConfig};

/// Records configuration.
#[derive(Debug, Clone, Default)]
pub struct RecordsConfig {
    pub database: DatabaseConfig,
    pub naming: NamingConfig,
}

impl RecordsConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// `DATABASE_URL` is the only connection input; pool bounds and the
    /// table-name exclusions fall back to defaults when unset.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DatabaseConfig::default();

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
            sqlx_logging: parse_or(&lookup, "DATABASE_SQLX_LOGGING", defaults.sqlx_logging)?,
        };
        if database.min_connections > database.max_connections {
            return Err(AppError::config(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS",
            ));
        }

        let naming = match lookup("TABLE_NAME_EXCLUDED") {
            Some(raw) => NamingConfig {
                excluded_segments: raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            None => NamingConfig::default(),
        };

        Ok(Self { database, naming })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
