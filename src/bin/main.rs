//! cachestats binary.
//!
//! Records, prints and sweeps object-cache statistics kept in a score-ranked store.

use cachestats_core::cli::{handle_discard, handle_get, handle_record, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = cli.command.logging();
    let level = logging.get_effective_level();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO).into())
                .parse_lossy(logging.log_filter.as_deref().unwrap_or("")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("cachestats starting");

    match cli.command {
        Commands::Record(cmd) => handle_record(cmd).await?,
        Commands::Get(cmd) => handle_get(cmd).await?,
        Commands::Discard(cmd) => handle_discard(cmd).await?,
    }

    Ok(())
}
