use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use tracing::info;

use super::commands::{DiscardCommand, GetCommand, OutputFormat, RecordCommand};
use crate::{
    config::{Args, ServiceConfig},
    metrics::{CacheMetrics, CacheStats, MeasuredCache, Snapshot, StaticCache},
    storage::{SortedSetStore, StoreBackendType},
};

/// Opens the configured store and wires a service around `cache`.
async fn build_metrics(args: &Args, cache: Arc<dyn MeasuredCache>) -> Result<CacheMetrics> {
    let config = ServiceConfig::load(args).context("Failed to load configuration")?;
    let store = StoreBackendType::from_config(&config.storage)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e.message()))?;
    store
        .init()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize store: {}", e.message()))?;

    info!(
        engine = %config.storage.engine,
        connection = %config.storage.connection,
        "store ready"
    );
    Ok(CacheMetrics::new(Arc::new(store), cache, config.metrics))
}

/// A healthy cache with zero counters, for commands that only touch the store.
fn store_only() -> Arc<dyn MeasuredCache> {
    Arc::new(StaticCache::new(CacheStats::default()))
}

pub async fn handle_record(cmd: RecordCommand) -> Result<()> {
    let stats = CacheStats {
        hits: cmd.hits,
        misses: cmd.misses,
        ratio: cmd.ratio,
        bytes: cmd.bytes,
        time: cmd.time,
        calls: cmd.calls,
    };
    let metrics = build_metrics(&cmd.config, Arc::new(StaticCache::new(stats))).await?;
    if !metrics.is_active() {
        info!("metrics disabled, nothing recorded");
        return Ok(());
    }
    let snapshot = metrics.collect();
    metrics.save(&snapshot).await;
    info!(id = snapshot.id(), timestamp = snapshot.timestamp(), "recorded snapshot");
    Ok(())
}

pub async fn handle_get(cmd: GetCommand) -> Result<()> {
    let metrics = build_metrics(&cmd.config, store_only()).await?;
    let snapshots = metrics.get(cmd.seconds).await;
    match cmd.format {
        OutputFormat::Json => {
            for snapshot in &snapshots {
                println!("{}", serde_json::to_string(snapshot)?);
            }
        }
        OutputFormat::Table => print_table(&snapshots),
    }
    Ok(())
}

pub async fn handle_discard(cmd: DiscardCommand) -> Result<()> {
    let metrics = build_metrics(&cmd.config, store_only()).await?;
    let removed = metrics.discard().await;
    info!(removed, max_time = metrics.max_time(), "discard finished");
    Ok(())
}

fn print_table(snapshots: &[Snapshot]) {
    println!(
        "{:<20} {:<12} {:>10} {:>10} {:>7} {:>12} {:>10} {:>10}",
        "time", "id", "hits", "misses", "ratio", "bytes", "cache_s", "calls"
    );
    for s in snapshots {
        let at = Utc
            .timestamp_opt(s.timestamp(), 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| s.timestamp().to_string());
        let ratio = s
            .ratio()
            .map(|r| format!("{:.3}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<12} {:>10} {:>10} {:>7} {:>12} {:>10.5} {:>10}",
            at,
            s.id(),
            s.hits(),
            s.misses(),
            ratio,
            s.bytes(),
            s.time(),
            s.calls()
        );
    }
}
