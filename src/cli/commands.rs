use clap::{Args, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::config::Args as ConfigArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Record one snapshot from the given counters
    Record(RecordCommand),
    /// Print snapshots from the recent window
    Get(GetCommand),
    /// Remove snapshots older than the retention horizon
    Discard(DiscardCommand),
}

impl Commands {
    pub fn logging(&self) -> &LoggingConfig {
        match self {
            Commands::Record(cmd) => &cmd.logging,
            Commands::Get(cmd) => &cmd.logging,
            Commands::Discard(cmd) => &cmd.logging,
        }
    }
}

#[derive(Debug, Args)]
pub struct RecordCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[arg(long, default_value_t = 0)]
    pub hits: u64,

    #[arg(long, default_value_t = 0)]
    pub misses: u64,

    /// Hit ratio; derived from hits and misses when omitted
    #[arg(long)]
    pub ratio: Option<f64>,

    #[arg(long, default_value_t = 0)]
    pub bytes: u64,

    /// Seconds spent in cache operations
    #[arg(long, default_value_t = 0.0)]
    pub time: f64,

    #[arg(long, default_value_t = 0)]
    pub calls: u64,
}

#[derive(Debug, Args)]
pub struct GetCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Window length in seconds (defaults to the retention horizon)
    #[arg(long)]
    pub seconds: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DiscardCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Logging configuration that can be set via CLI or env vars
#[derive(Debug, Clone, Default, Args, Deserialize)]
pub struct LoggingConfig {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    #[serde(skip)]
    pub verbose: u8,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", env = "CACHESTATS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log filter directives
    #[arg(long = "log-filter", env = "CACHESTATS_LOG_FILTER")]
    pub log_filter: Option<String>,
}

impl LoggingConfig {
    pub fn get_effective_level(&self) -> &str {
        match (self.verbose, self.log_level.as_deref()) {
            (v, _) if v >= 2 => "trace",
            (1, _) => "debug",
            (0, Some(level)) => level,
            _ => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_beats_configured_level() {
        let mut logging = LoggingConfig {
            log_level: Some("warn".into()),
            ..Default::default()
        };
        assert_eq!(logging.get_effective_level(), "warn");
        logging.verbose = 1;
        assert_eq!(logging.get_effective_level(), "debug");
        logging.verbose = 3;
        assert_eq!(logging.get_effective_level(), "trace");
    }
}
