//! fanhub - load and summarize the site's JSON documents
//!
//! Usage: `fanhub [KEY|room:ROOM_ID ...]`. Without arguments the four
//! well-known documents are loaded.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fanhub::models::{
    keys, live_members, schedules_in_month, ChatMessage, ChatRoom, Member, ScheduleItem, TradeItem,
};
use fanhub::{Config, Fetcher, Resource, ResourceState};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured data source and retry orchestrator
/// 4. Load every requested key and print a summary line
/// 5. On Ctrl+C, drop pending loads (tearing their sessions down)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fanhub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: source={:?}, base_path={}, cache_enabled={}, ttl={}ms, max_attempts={}, base_delay={}ms, retry_on={:?}",
        config.data_source,
        config.base_path,
        config.cache.enabled,
        config.cache.ttl_ms,
        config.retry.max_attempts,
        config.retry.base_delay_ms,
        config.retry.retry_on
    );

    let fetcher = Arc::new(Fetcher::from_config(&config).context("failed to set up data source")?);

    let mut requested: Vec<String> = env::args().skip(1).collect();
    if requested.is_empty() {
        requested = keys::DEFAULT_KEYS.iter().map(|k| k.to_string()).collect();
    }

    tokio::select! {
        _ = load_all(&fetcher, &requested) => {
            info!("Done");
        }
        _ = shutdown_signal() => {
            warn!("Interrupted, pending loads torn down");
        }
    }

    Ok(())
}

async fn load_all(fetcher: &Arc<Fetcher>, requested: &[String]) {
    for arg in requested {
        println!("{}", summarize(fetcher, arg).await);
    }
}

async fn summarize(fetcher: &Arc<Fetcher>, arg: &str) -> String {
    if let Some(room_id) = arg.strip_prefix("room:") {
        let state = load::<Vec<ChatMessage>>(fetcher, &keys::chat_room(room_id)).await;
        return describe(state, |messages| {
            let posts = messages.iter().filter(|m| !m.is_divider()).count();
            format!("{} messages", posts)
        });
    }

    match arg {
        keys::STATUS => describe(load::<Vec<Member>>(fetcher, arg).await, |members| {
            format!("{} members, {} live", members.len(), live_members(members).len())
        }),
        keys::SCHEDULES => describe(load::<Vec<ScheduleItem>>(fetcher, arg).await, |items| {
            let now = Utc::now();
            let this_month = schedules_in_month(items, now.year(), now.month());
            format!("{} entries, {} this month", items.len(), this_month.len())
        }),
        keys::CHAT_ROOMS => describe(load::<Vec<ChatRoom>>(fetcher, arg).await, |rooms| {
            let today: u32 = rooms.iter().map(|r| r.today_post_count).sum();
            format!("{} rooms, {} posts today", rooms.len(), today)
        }),
        keys::GOODS_TRADE => describe(load::<Vec<TradeItem>>(fetcher, arg).await, |trades| {
            let active = trades.iter().filter(|t| t.is_active()).count();
            format!("{} trades, {} active", trades.len(), active)
        }),
        _ => describe(load::<Value>(fetcher, arg).await, |value| match value {
            Value::Array(items) => format!("array of {}", items.len()),
            Value::Object(fields) => format!("object with {} fields", fields.len()),
            other => format!("{}", other),
        }),
    }
}

async fn load<T>(fetcher: &Arc<Fetcher>, key: &str) -> ResourceState<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let resource = Resource::new(Arc::clone(fetcher), key);
    resource.settled().await
}

fn describe<T>(state: ResourceState<T>, summary: impl FnOnce(&T) -> String) -> String {
    match (&state.data, &state.error) {
        (Some(data), _) => format!("{:<12} ok     {}", state.key, summary(data.as_ref())),
        (None, Some(error)) => format!("{:<12} error  {}", state.key, error),
        (None, None) => format!("{:<12} {:?}", state.key, state.status),
    }
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
