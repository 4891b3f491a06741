//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `PG_*`: PostgreSQL settings
//! - `HW_*`: Hostware endpoint settings
//! - `OB_*`: Observability settings

use crate::config::{Config, HostwareConfig, ObservabilityConfig, StorageConfig};
use std::env;

/// Load configuration from environment variables.
///
/// Environment variables override default values but can be overridden by
/// values loaded from a config file being merged on top by the caller.
///
/// ## Environment Variables
/// ### PostgreSQL Settings (`PG_*`)
/// - `PG_HOST`: Database host (default: "localhost")
/// - `PG_PORT`: Database port (default: 5432)
/// - `PG_DATABASE`: Database name (default: "ovation")
/// - `PG_USERNAME`: Database user (default: "postgres")
/// - `PG_PASSWORD`: Database password (default: "")
/// - `PG_POOL_SIZE`: Connection pool size (default: 10)
/// - `PG_TIMEOUT_SECONDS`: Connection timeout in seconds (default: 30)
///
/// ### Hostware Settings (`HW_*`)
/// - `HW_BASE_URL`: API base URL (default: "https://api.hostware.io")
/// - `HW_TIMEOUT_SECONDS`: Request timeout in seconds (default: 30)
///
/// ### Observability Settings (`OB_*`)
/// - `OB_METRICS_ENABLED`: Enable metrics (true/false, default: true)
/// - `OB_TRACING_ENABLED`: Enable tracing (true/false, default: true)
/// - `OB_LOGGING_LEVEL`: Logging level (trace/debug/info/warn/error, default:
///   "info")
pub fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config {
        storage: load_storage_from_env()?,
        hostware: load_hostware_from_env()?,
        observability: load_observability_from_env()?,
    };

    Ok(config)
}

fn load_storage_from_env() -> Result<StorageConfig, Box<dyn std::error::Error>> {
    Ok(StorageConfig {
        host: env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: parse_env("PG_PORT").unwrap_or(5432),
        database: env::var("PG_DATABASE").unwrap_or_else(|_| "ovation".to_string()),
        username: env::var("PG_USERNAME").unwrap_or_else(|_| "postgres".to_string()),
        password: env::var("PG_PASSWORD").unwrap_or_default(),
        pool_size: parse_env("PG_POOL_SIZE").unwrap_or(10),
        timeout_seconds: parse_env("PG_TIMEOUT_SECONDS").unwrap_or(30),
    })
}

fn load_hostware_from_env() -> Result<HostwareConfig, Box<dyn std::error::Error>> {
    Ok(HostwareConfig {
        base_url: env::var("HW_BASE_URL").unwrap_or_else(|_| "https://api.hostware.io".to_string()),
        timeout_seconds: parse_env("HW_TIMEOUT_SECONDS").unwrap_or(30),
    })
}

fn load_observability_from_env() -> Result<ObservabilityConfig, Box<dyn std::error::Error>> {
    Ok(ObservabilityConfig {
        metrics_enabled: parse_env("OB_METRICS_ENABLED").unwrap_or(true),
        tracing_enabled: parse_env("OB_TRACING_ENABLED").unwrap_or(true),
        logging_level: env::var("OB_LOGGING_LEVEL").unwrap_or_else(|_| "info".to_string()),
    })
}

fn parse_env<T>(key: &str) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(s) => s
            .parse::<T>()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>),
        Err(e) => Err(Box::new(e) as Box<dyn std::error::Error>),
    }
}
