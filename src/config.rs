//! Application-level configuration loading from the process environment.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::dao::quiz_store::sql::SqlConfig;

/// Port the server listens on when neither `PORT` nor `SERVER_PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;
/// Questions served per `GET /api/questions`.
pub const DEFAULT_QUESTION_BATCH_SIZE: u64 = 10;
/// Rows served per `GET /api/leaderboard`.
pub const DEFAULT_LEADERBOARD_LIMIT: u64 = 10;
const DEFAULT_DB_USER: &str = "root";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// How to reach the database; `None` starts the server degraded.
    pub database: Option<SqlConfig>,
    /// Upper bound on questions per batch.
    pub question_batch_size: u64,
    /// Upper bound on leaderboard rows served.
    pub leaderboard_limit: u64,
}

impl AppConfig {
    /// Load the configuration from the environment. Call `dotenvy::dotenv()` first
    /// to pick up a `.env` file.
    pub fn load() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        info!(
            port = config.port,
            database = config.database.is_some(),
            question_batch_size = config.question_batch_size,
            leaderboard_limit = config.leaderboard_limit,
            "loaded configuration"
        );
        config
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => parse_or("PORT", &value, DEFAULT_PORT),
            None => parse_var(&lookup, "SERVER_PORT", DEFAULT_PORT),
        };

        Self {
            port,
            database: database_config(&lookup),
            question_batch_size: parse_var(
                &lookup,
                "QUESTION_BATCH_SIZE",
                DEFAULT_QUESTION_BATCH_SIZE,
            ),
            leaderboard_limit: parse_var(&lookup, "LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: None,
            question_batch_size: DEFAULT_QUESTION_BATCH_SIZE,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

/// `DATABASE_URL` wins; otherwise `DB_HOST` and `DB_NAME` are required to assemble one.
fn database_config<F>(lookup: &F) -> Option<SqlConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
        return Some(SqlConfig::new(url));
    }

    let host = lookup("DB_HOST")?;
    let database = lookup("DB_NAME")?;
    let user = lookup("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_owned());
    let password = lookup("DB_PASSWORD");
    let port = lookup("DB_PORT").and_then(|value| match value.parse::<u16>() {
        Ok(port) => Some(port),
        Err(err) => {
            warn!(value = %value, error = %err, "invalid DB_PORT; using the driver default");
            None
        }
    });

    match SqlConfig::from_parts(&host, port, &user, password.as_deref(), &database) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(error = %err, "unusable database parameters; starting without a store");
            None
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => parse_or(key, &value, default),
        None => default,
    }
}

fn parse_or<T>(key: &'static str, value: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(
                key,
                value = %value,
                error = %err,
                default = %default,
                "invalid configuration value; falling back to default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.port, 5000);
        assert!(config.database.is_none());
        assert_eq!(config.question_batch_size, 10);
        assert_eq!(config.leaderboard_limit, 10);
    }

    #[test]
    fn port_prefers_port_over_server_port() {
        assert_eq!(config_from(&[("SERVER_PORT", "7000")]).port, 7000);
        assert_eq!(
            config_from(&[("PORT", "8000"), ("SERVER_PORT", "7000")]).port,
            8000
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "http"), ("QUESTION_BATCH_SIZE", "-3")]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.question_batch_size, 10);
    }

    #[test]
    fn database_url_takes_precedence() {
        let config = config_from(&[
            ("DATABASE_URL", "mysql://u:p@db/quiz"),
            ("DB_HOST", "ignored"),
            ("DB_NAME", "ignored"),
        ]);
        assert_eq!(config.database.unwrap().url, "mysql://u:p@db/quiz");
    }

    #[test]
    fn database_url_assembled_from_parts() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "3307"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "quiz"),
        ]);
        assert_eq!(
            config.database.unwrap().url,
            "mysql://root:secret@db:3307/quiz"
        );
    }

    #[test]
    fn database_password_with_reserved_characters_is_encoded() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_PASSWORD", "pa/ss#1"),
            ("DB_NAME", "quiz"),
        ]);
        assert_eq!(config.database.unwrap().url, "mysql://root:pa%2Fss%231@db/quiz");
    }

    #[test]
    fn unusable_host_leaves_database_unset() {
        let config = config_from(&[("DB_HOST", "db host"), ("DB_NAME", "quiz")]);
        assert!(config.database.is_none());
    }

    #[test]
    fn partial_parts_leave_database_unset() {
        assert!(config_from(&[("DB_HOST", "db")]).database.is_none());
    }
}
