use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// "json" or "pretty"
    pub log_format: String,
}

/// Settings for the balance-update job runner
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub poll_interval_secs: u64,
    pub batch_size: u32,
    pub max_attempts: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 30,
            batch_size: 50,
            max_attempts: 5,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_or("SCHEDULER_ENABLED", defaults.enabled)?,
            poll_interval_secs: env_or("SCHEDULER_POLL_INTERVAL_SECS", defaults.poll_interval_secs)?,
            batch_size: env_or("SCHEDULER_BATCH_SIZE", defaults.batch_size)?,
            max_attempts: env_or("SCHEDULER_MAX_ATTEMPTS", defaults.max_attempts)?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            scheduler: SchedulerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.app.log_format.as_str(), "json" | "pretty") {
            return Err(AppError::Configuration(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                self.app.log_format
            )));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "Database pool size cannot exceed max connections".to_string(),
            ));
        }

        if self.scheduler.poll_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Scheduler poll interval must be greater than 0".to_string(),
            ));
        }

        if self.scheduler.batch_size == 0 {
            return Err(AppError::Configuration(
                "Scheduler batch size must be greater than 0".to_string(),
            ));
        }

        if self.scheduler.max_attempts == 0 {
            return Err(AppError::Configuration(
                "Scheduler max attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
