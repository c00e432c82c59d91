//! Image Cache - command line loader
//!
//! Loads every URL given on the command line through a [`CachingLoader`],
//! twice, so the second pass is served from the cache. Prints a JSON report.

use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_cache::{CacheStats, CachingLoader, Config, LoaderError};

#[derive(Debug, Serialize)]
struct LoadRecord {
    url: String,
    pass: u8,
    bytes: Option<usize>,
    error: Option<String>,
    elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
struct RunReport {
    timestamp: String,
    loads: Vec<LoadRecord>,
    cache: CacheStats,
}

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the loader (HTTP fetcher + internal cache)
/// 4. Load each URL twice, stopping early on Ctrl+C
/// 5. Print the run report
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        anyhow::bail!("usage: image_cache <url>...");
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, entry_lifetime={}s, fetch_timeout={}s",
        config.cache.capacity,
        config.cache.entry_lifetime.as_secs(),
        config.fetch_timeout.as_secs()
    );

    let loader: CachingLoader<String, _> =
        CachingLoader::from_config(&config).context("failed to build HTTP fetcher")?;

    let mut loads = Vec::with_capacity(urls.len() * 2);
    'passes: for pass in 1..=2u8 {
        for url in &urls {
            let started = Instant::now();
            let result = loader.load_or_cancel(url, ctrl_c()).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let record = match result {
                Ok(bytes) => {
                    info!(%url, pass, bytes = bytes.len(), elapsed_ms, "loaded");
                    LoadRecord {
                        url: url.clone(),
                        pass,
                        bytes: Some(bytes.len()),
                        error: None,
                        elapsed_ms,
                    }
                }
                Err(LoaderError::Cancelled) => {
                    warn!("Received Ctrl+C, stopping");
                    break 'passes;
                }
                Err(err) => {
                    warn!(%url, pass, error = %err, "load failed");
                    LoadRecord {
                        url: url.clone(),
                        pass,
                        bytes: None,
                        error: Some(err.to_string()),
                        elapsed_ms,
                    }
                }
            };
            loads.push(record);
        }
    }

    let report = RunReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        loads,
        cache: loader.cache().stats(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed it never resolves.
async fn ctrl_c() {
    if signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
