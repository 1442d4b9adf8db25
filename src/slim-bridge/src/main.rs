// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod bridge;
mod config;
mod feed;
mod topic;
mod transport;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use slim_app::init_logging;
use slim_core::DynResult;
use slim_frame::{CachePolicy, SlimDecoder};

use bridge::{run_feed, BridgeSettings};
use config::BridgeConfig;
use feed::FeedAccess;
use topic::{subscription_filter, validate_filter};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - SLIM telemetry decoder bridge");
const SHUTDOWN_GRACE: Duration = Duration::from_millis(400);

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Where payloads come from
    #[arg(short = 'f', long = "feed", value_enum)]
    feed: Option<FeedKind>,
    /// Gateway address when the feed is TCP: <host>:<port>
    #[arg(value_name = "FEED_ADDR")]
    feed_addr: Option<String>,
    /// Topic to subscribe to (trailing '/' subscribes to the subtree)
    #[arg(short = 's', long = "subscribe")]
    subscribe: Option<String>,
    /// Topic decoded events are published on
    #[arg(short = 'p', long = "publish")]
    publish: Option<String>,
    /// Maximum number of buoys in the position cache
    #[arg(short = 'm', long = "max-buoys")]
    max_buoys: Option<usize>,
    /// Evict the oldest buoy instead of rejecting new ones when the cache is full
    #[arg(long = "evict-oldest")]
    evict_oldest: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FeedKind {
    Stdio,
    Tcp,
}

/// Resolved configuration after merging config file and CLI arguments.
#[derive(Debug)]
struct ResolvedConfig {
    access: FeedAccess,
    settings: BridgeSettings,
    max_buoys: usize,
    policy: CachePolicy,
}

fn resolve_config(cli: &Cli, cfg: &BridgeConfig) -> DynResult<ResolvedConfig> {
    let feed_type = cli
        .feed
        .as_ref()
        .map(|f| match f {
            FeedKind::Stdio => "stdio",
            FeedKind::Tcp => "tcp",
        })
        .or(cfg.feed.feed_type.as_deref());

    let access = match feed_type {
        Some("stdio") | None => FeedAccess::Stdio,
        Some("tcp") => {
            let addr = if let Some(ref addr) = cli.feed_addr {
                addr.clone()
            } else if let (Some(host), Some(port)) = (&cfg.feed.host, cfg.feed.port) {
                format!("{}:{}", host, port)
            } else {
                return Err("TCP feed requires host:port. Use argument or set [feed].host and .port in config.".into());
            };
            FeedAccess::Tcp { addr }
        }
        Some(other) => return Err(format!("Unknown feed type: {}", other).into()),
    };

    let subscribe = cli
        .subscribe
        .clone()
        .unwrap_or_else(|| cfg.topics.subscribe.clone());
    let subscription = subscription_filter(&subscribe);
    validate_filter(&subscription)?;
    let publish = cli
        .publish
        .clone()
        .unwrap_or_else(|| cfg.topics.publish.clone());

    let max_buoys = cli.max_buoys.unwrap_or(cfg.cache.max_buoys);
    if max_buoys == 0 {
        return Err("Maximum number of buoys must be > 0".into());
    }
    let policy = if cli.evict_oldest {
        CachePolicy::EvictOldest
    } else {
        cfg.cache.full_policy.into()
    };

    Ok(ResolvedConfig {
        access,
        settings: BridgeSettings::new(subscription, publish),
        max_buoys,
        policy,
    })
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", BridgeConfig::example_combined_toml());
        return Ok(());
    }

    let (cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = BridgeConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        BridgeConfig::load_from_default_paths()?
    };
    cfg.validate()
        .map_err(|e| format!("Invalid bridge configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let resolved = resolve_config(&cli, &cfg)?;
    match &resolved.access {
        FeedAccess::Stdio => info!("Starting slim-bridge (feed: stdio)"),
        FeedAccess::Tcp { addr } => info!("Starting slim-bridge (feed: tcp {})", addr),
    }
    info!(
        "Position cache: {} buoys, {} when full",
        resolved.max_buoys,
        match resolved.policy {
            CachePolicy::Reject => "reject",
            CachePolicy::EvictOldest => "evict oldest",
        }
    );

    let decoder = SlimDecoder::with_capacity(resolved.max_buoys, resolved.policy);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut bridge = tokio::spawn(run_feed(
        resolved.access,
        resolved.settings,
        decoder,
        shutdown_rx,
    ));

    tokio::select! {
        res = &mut bridge => {
            match res {
                Ok(Ok(_)) => info!("Feed closed, exiting"),
                Ok(Err(e)) => error!("Bridge error: {}", e),
                Err(e) => error!("Bridge task failed: {:?}", e),
            }
            return Ok(());
        }
        res = signal::ctrl_c() => res?,
    }

    info!("Ctrl+C received, shutting down");
    let _ = shutdown_tx.send(true);
    tokio::time::sleep(SHUTDOWN_GRACE).await;
    if !bridge.is_finished() {
        bridge.abort();
    }
    let _ = bridge.await;
    Ok(())
}
