//! Cache maintenance commands: list, sweep, and the cleanup loop

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use ower_core::{CacheStore, CleanupSweeper, Config, IntervalTrigger, run_cleanup};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputFormat, format_age, format_bytes, print_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow {
    tag: String,
    file: String,
    size_bytes: u64,
    stored_at: String,
    age_secs: u64,
}

fn sweeper(config: &Config) -> CleanupSweeper {
    let store = Arc::new(CacheStore::new(config.cache.dir.clone()));
    CleanupSweeper::new(store, config.cache.ttl())
}

/// Execute `cache list`
pub fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let store = CacheStore::new(config.cache.dir.clone());
    let now = SystemTime::now();
    let rows: Vec<EntryRow> = store
        .entries()
        .with_context(|| format!("Failed to read cache at {}", store.root().display()))?
        .into_iter()
        .map(|entry| EntryRow {
            tag: entry.key.tag(),
            file: entry
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes: entry.size_bytes,
            stored_at: DateTime::<Utc>::from(entry.stored_at).to_rfc3339(),
            age_secs: now
                .duration_since(entry.stored_at)
                .unwrap_or_default()
                .as_secs(),
        })
        .collect();

    if format.is_machine() {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("Cache is empty ({})", store.root().display());
        return Ok(());
    }
    let ttl = config.cache.ttl().as_secs();
    for row in &rows {
        let age = format_age(row.age_secs);
        let age = if row.age_secs > ttl {
            age.red().to_string()
        } else {
            age.green().to_string()
        };
        println!(
            "{:<28} {:>10} {:>6}",
            row.tag,
            format_bytes(row.size_bytes),
            age
        );
    }
    Ok(())
}

/// Execute `cache sweep`
pub fn sweep(config: &Config, format: OutputFormat) -> Result<()> {
    let report = sweeper(config)
        .sweep(SystemTime::now())
        .context("Cache sweep failed")?;
    if format.is_machine() {
        return print_json(&report);
    }
    println!(
        "Removed {} of {} entries ({} kept)",
        report.removed.to_string().bold(),
        report.examined,
        report.retained
    );
    Ok(())
}

/// Execute `cleanup`: sweep on a fixed period until interrupted.
pub async fn run_loop(config: &Config, interval_hours: Option<u64>) -> Result<()> {
    let period = interval_hours.map_or_else(
        || config.cache.cleanup_interval(),
        |hours| Duration::from_secs(hours.saturating_mul(3600)),
    );
    let sweeper = sweeper(config);
    info!(
        "Sweeping {} every {}",
        config.cache.dir.display(),
        format_age(period.as_secs())
    );

    tokio::select! {
        runs = run_cleanup(&sweeper, IntervalTrigger::new(period)) => {
            info!("Cleanup trigger finished after {} sweeps", runs);
        },
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Cleanup stopped");
        },
    }
    Ok(())
}
