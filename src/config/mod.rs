//! Configuration management for database and application settings.
//!
//! All configuration comes from environment variables (optionally loaded from a
//! `.env` file by `main`), with sensible defaults for local development.

/// Database configuration and connection management
pub mod database;

use crate::errors::{Error, Result};
use std::time::Duration;

/// Default number of seconds between scheduled generation runs (one hour).
const DEFAULT_GENERATION_INTERVAL_SECS: u64 = 3600;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Interval between scheduled recurring-generation runs
    pub generation_interval: Duration,
}

/// Loads the application configuration from the environment.
///
/// Reads `DATABASE_URL` (falling back to a local `SQLite` file) and
/// `SPENDWISE_GENERATION_INTERVAL_SECS` (falling back to one hour).
///
/// # Errors
/// Returns [`Error::Config`] if the interval variable is set but not a
/// positive integer.
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url = database::get_database_url();

    let generation_interval = match std::env::var("SPENDWISE_GENERATION_INTERVAL_SECS") {
        Ok(raw) => parse_interval_secs(&raw)?,
        Err(_) => Duration::from_secs(DEFAULT_GENERATION_INTERVAL_SECS),
    };

    Ok(AppConfig {
        database_url,
        generation_interval,
    })
}

/// Parses a raw interval string into a `Duration`, rejecting zero and
/// non-numeric values.
fn parse_interval_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Invalid SPENDWISE_GENERATION_INTERVAL_SECS \"{raw}\": {e}"),
    })?;

    if secs == 0 {
        return Err(Error::Config {
            message: "SPENDWISE_GENERATION_INTERVAL_SECS must be positive".to_string(),
        });
    }

    Ok(Duration::from_secs(secs))
}
