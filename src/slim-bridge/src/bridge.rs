// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Bridge loop: take payloads from the feed, decode them, publish events.
//!
//! One message is decoded and published in full before the next is read.

use tokio::io::{self, BufReader};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use slim_core::DynResult;
use slim_frame::{Frame, ScanState, SlimDecoder};

use crate::feed::{FeedAccess, LineSink, LineSource};
use crate::topic::topic_matches;
use crate::transport::{EventSink, InboundMessage, PayloadSource};

pub const STATS_INTERVAL: Duration = Duration::from_secs(60);
const RECONNECT_MAX_DELAY_SECS: u64 = 60;

/// Subscription filter, publish topic and stats cadence of one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    pub subscription: String,
    pub publish: String,
    pub stats_interval: Duration,
}

impl BridgeSettings {
    pub fn new(subscription: String, publish: String) -> Self {
        Self {
            subscription,
            publish,
            stats_interval: STATS_INTERVAL,
        }
    }
}

/// Running counters, logged periodically and on exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub received: u64,
    pub ignored_topics: u64,
    pub status: u64,
    pub telemetry: u64,
    pub reserved: u64,
    pub events: u64,
    pub aborted: u64,
    pub errors: u64,
    pub malformed: u64,
    pub reconnects: u64,
    /// Number of times the counters were logged.
    pub reports: u64,
}

impl BridgeStats {
    fn report(&mut self) {
        self.reports += 1;
        info!(
            "SLIM bridge stats: received={}, ignored_topics={}, status={}, telemetry={}, reserved={}, events={}, aborted={}, errors={}, malformed={}, reconnects={}",
            self.received,
            self.ignored_topics,
            self.status,
            self.telemetry,
            self.reserved,
            self.events,
            self.aborted,
            self.errors,
            self.malformed,
            self.reconnects
        );
    }
}

pub async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if *shutdown_rx.borrow() {
        return;
    }
    while shutdown_rx.changed().await.is_ok() {
        if *shutdown_rx.borrow() {
            break;
        }
    }
}

/// Decode one message and publish its events.
///
/// Decoder errors are counted and logged, never returned. Only a failing
/// sink ends the bridge.
async fn handle_message<K: EventSink + ?Sized>(
    msg: &InboundMessage,
    sink: &mut K,
    decoder: &mut SlimDecoder,
    settings: &BridgeSettings,
    stats: &mut BridgeStats,
) -> DynResult<()> {
    stats.received += 1;
    if !topic_matches(&settings.subscription, &msg.topic) {
        stats.ignored_topics += 1;
        debug!("Topic of no interest: {}", msg.topic);
        return Ok(());
    }

    match decoder.decode(&msg.payload) {
        Ok(Frame::Status(_)) => stats.status += 1,
        Ok(Frame::Reserved(_)) => stats.reserved += 1,
        Ok(Frame::Telemetry(mut scanner)) => {
            stats.telemetry += 1;
            for event in scanner.by_ref() {
                sink.publish(&settings.publish, &event).await?;
                stats.events += 1;
            }
            if scanner.state() == ScanState::Aborted {
                stats.aborted += 1;
            }
        }
        Err(e) => {
            stats.errors += 1;
            warn!("Dropping payload on '{}': {}", msg.topic, e);
        }
    }
    Ok(())
}

/// Run until the source closes or shutdown is signalled.
///
/// The decoder and stats outlive a single call so that the position cache
/// survives a feed reconnect.
pub async fn run_bridge<S, K>(
    source: &mut S,
    sink: &mut K,
    decoder: &mut SlimDecoder,
    settings: &BridgeSettings,
    stats: &mut BridgeStats,
    mut shutdown_rx: watch::Receiver<bool>,
) -> DynResult<()>
where
    S: PayloadSource + ?Sized,
    K: EventSink + ?Sized,
{
    let mut stats_tick = time::interval_at(
        Instant::now() + settings.stats_interval,
        settings.stats_interval,
    );
    stats_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        let next = tokio::select! {
            _ = wait_for_shutdown(shutdown_rx.clone()) => return Ok(()),
            _ = stats_tick.tick() => {
                stats.report();
                continue;
            }
            next = source.next_message() => next?,
        };
        let Some(msg) = next else {
            return Ok(());
        };

        handle_message(&msg, sink, decoder, settings, stats).await?;

        if *shutdown_rx.borrow_and_update() {
            return Ok(());
        }
    }
}

/// Run the bridge over the configured feed.
///
/// Stdio runs once until EOF. TCP reconnects with exponential backoff
/// (1 s -> 2 s -> ... -> 60 s) until shutdown.
pub async fn run_feed(
    access: FeedAccess,
    settings: BridgeSettings,
    mut decoder: SlimDecoder,
    shutdown_rx: watch::Receiver<bool>,
) -> DynResult<BridgeStats> {
    let mut stats = BridgeStats::default();
    info!(
        "SLIM bridge: subscribed to '{}', publishing to '{}'",
        settings.subscription, settings.publish
    );

    match access {
        FeedAccess::Stdio => {
            let mut source = LineSource::new(BufReader::new(io::stdin()));
            let mut sink = LineSink::new(io::stdout());
            let result = run_bridge(
                &mut source,
                &mut sink,
                &mut decoder,
                &settings,
                &mut stats,
                shutdown_rx,
            )
            .await;
            stats.malformed += source.malformed();
            result?;
        }
        FeedAccess::Tcp { addr } => {
            let mut backoff_secs: u64 = 1;
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                let stream = tokio::select! {
                    _ = wait_for_shutdown(shutdown_rx.clone()) => break,
                    res = TcpStream::connect(addr.as_str()) => res,
                };
                match stream {
                    Ok(stream) => {
                        info!("SLIM bridge: connected to feed {}", addr);
                        backoff_secs = 1;
                        let (read_half, write_half) = stream.into_split();
                        let mut source = LineSource::new(BufReader::new(read_half));
                        let mut sink = LineSink::new(write_half);
                        let result = run_bridge(
                            &mut source,
                            &mut sink,
                            &mut decoder,
                            &settings,
                            &mut stats,
                            shutdown_rx.clone(),
                        )
                        .await;
                        stats.malformed += source.malformed();
                        match result {
                            Ok(()) => info!("SLIM bridge: feed {} closed", addr),
                            Err(e) => warn!("SLIM bridge: feed {} failed: {}", addr, e),
                        }
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(
                            "SLIM bridge: connection to {} failed: {}, retrying in {}s",
                            addr, e, backoff_secs
                        );
                    }
                }
                stats.reconnects += 1;
                tokio::select! {
                    _ = wait_for_shutdown(shutdown_rx.clone()) => break,
                    _ = time::sleep(Duration::from_secs(backoff_secs)) => {}
                }
                backoff_secs = (backoff_secs * 2).min(RECONNECT_MAX_DELAY_SECS);
            }
        }
    }

    stats.report();
    info!(
        "SLIM bridge: {} of {} buoy positions known at exit",
        decoder.cache().len(),
        decoder.cache().capacity()
    );
    Ok(stats)
}
