use std::{fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub token_ttl: chrono::Duration,
    pub db_timeout: Duration,
    pub db_pool_size: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;

        let host = try_load(&lookup, "HOST", "127.0.0.1")?;
        let port = try_load(&lookup, "PORT", "3000")?;
        let token_ttl_secs: i64 = positive(&lookup, "TOKEN_TTL_SECS", "3600")?;
        let db_timeout_ms: u64 = positive(&lookup, "DB_TIMEOUT_MS", "5000")?;
        let db_pool_size: u32 = positive(&lookup, "DB_POOL_SIZE", "10")?;

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            token_ttl: chrono::Duration::seconds(token_ttl_secs),
            db_timeout: Duration::from_millis(db_timeout_ms),
            db_pool_size,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{} not set, using default: {}", key, default);
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

fn positive<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: Display,
{
    let value: T = try_load(lookup, key, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
