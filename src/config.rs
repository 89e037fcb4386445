//! Configuration management for cachestats.
//!
//! Configuration is layered, with later sources overriding earlier ones:
//! 1. Default configuration (embedded in binary)
//! 2. System-wide configuration file (`/etc/cachestats/config.toml`)
//! 3. User-specified configuration file
//! 4. Environment variables prefixed with `CACHESTATS_` (nested keys use `__`)
//! 5. The host flags `DISABLE_METRICS` and `METRICS_MAX_TIME`
//! 6. Command-line arguments
//!
//! # Environment Variables
//!
//! - `DISABLE_METRICS` - Turn recording, reading and sweeping into no-ops
//! - `METRICS_MAX_TIME` - Retention horizon in seconds (default 3600)
//! - `CACHESTATS_STORAGE__ENGINE` - Store engine (`memory` or `duckdb`)
//! - `CACHESTATS_STORAGE__CONNECTION` - Store connection string
//! - `CACHESTATS_METRICS__PREFIX` - Key namespace prefix

use clap::Args as ClapArgs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use crate::error::Result;

/// Default retention horizon, one hour.
pub const DEFAULT_MAX_TIME: i64 = 3600;

/// Command-line arguments shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store engine type (memory, duckdb)
    #[arg(long)]
    pub engine: Option<String>,

    /// Store connection string (database path for duckdb)
    #[arg(long)]
    pub connection: Option<String>,

    /// Key namespace prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Retention horizon in seconds
    #[arg(long)]
    pub max_time: Option<i64>,
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metrics recording configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Store backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store engine type
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Connection string
    #[serde(default = "default_connection")]
    pub connection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            connection: default_connection(),
        }
    }
}

/// Metrics recording configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Disable recording, reading and sweeping
    #[serde(default)]
    pub disabled: bool,
    /// Retention horizon override in seconds
    #[serde(default)]
    pub max_time: Option<i64>,
    /// Cache-wide key prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Deadline for a single store round-trip
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            max_time: None,
            prefix: default_prefix(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl MetricsConfig {
    /// Retention horizon in seconds.
    ///
    /// Returns the configured override when it is positive, one hour otherwise.
    pub fn max_time(&self) -> i64 {
        match self.max_time {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_MAX_TIME,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from all sources
    pub fn load(args: &Args) -> Result<Self> {
        Self::load_with_env(args, |key| env::var(key).ok())
    }

    /// Load configuration, resolving the host flags through `lookup`.
    pub fn load_with_env<F>(args: &Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name("/etc/cachestats/config.toml").required(false));

        if let Some(path) = &args.config {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix("CACHESTATS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("metrics.disabled", lookup("DISABLE_METRICS"))?
            .set_override_option("metrics.max_time", lookup("METRICS_MAX_TIME"))?;

        let mut config: ServiceConfig = builder.build()?.try_deserialize()?;

        if let Some(engine) = &args.engine {
            config.storage.engine = engine.clone();
        }
        if let Some(connection) = &args.connection {
            config.storage.connection = connection.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.metrics.prefix = prefix.clone();
        }
        if let Some(max_time) = args.max_time {
            config.metrics.max_time = Some(max_time);
        }

        Ok(config)
    }
}

fn default_engine() -> String {
    "duckdb".to_string()
}

fn default_connection() -> String {
    ":memory:".to_string()
}

fn default_prefix() -> String {
    "cache".to_string()
}

fn default_store_timeout_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_config_defaults() {
        let config = ServiceConfig::load_with_env(&Args::default(), no_env).unwrap();
        assert!(!config.metrics.disabled);
        assert_eq!(config.metrics.max_time(), DEFAULT_MAX_TIME);
        assert_eq!(config.metrics.prefix, "cache");
        assert_eq!(config.metrics.store_timeout_ms, 1000);
        assert_eq!(config.storage.engine, "duckdb");
    }

    #[test]
    fn test_host_flags() {
        let config = ServiceConfig::load_with_env(&Args::default(), |key| match key {
            "DISABLE_METRICS" => Some("true".to_string()),
            "METRICS_MAX_TIME" => Some("7200".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(config.metrics.disabled);
        assert_eq!(config.metrics.max_time(), 7200);
    }

    #[test]
    fn test_args_override() {
        let args = Args {
            engine: Some("memory".into()),
            prefix: Some("site42".into()),
            max_time: Some(600),
            ..Default::default()
        };
        let config = ServiceConfig::load_with_env(&args, |key| match key {
            "METRICS_MAX_TIME" => Some("7200".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.storage.engine, "memory");
        assert_eq!(config.metrics.prefix, "site42");
        assert_eq!(config.metrics.max_time(), 600);
    }

    #[test]
    fn test_non_positive_max_time_falls_back() {
        let mut metrics = MetricsConfig::default();
        metrics.max_time = Some(0);
        assert_eq!(metrics.max_time(), DEFAULT_MAX_TIME);
        metrics.max_time = Some(-5);
        assert_eq!(metrics.max_time(), DEFAULT_MAX_TIME);
        metrics.max_time = Some(90);
        assert_eq!(metrics.max_time(), 90);
    }
}
