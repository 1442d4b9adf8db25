// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! JSON-Lines feed: one envelope per line in, one event per line out.
//!
//! Inbound: `{"topic": "toServer", "payload": "<base64>"}`
//! Outbound: `{"topic": "defaultPublishTopic", "event": {...}}`

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use slim_core::DecodedEvent;

use crate::transport::{EventSink, InboundMessage, PayloadSource, TransportFuture};

/// Where the feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAccess {
    Stdio,
    /// `host:port` of a gateway speaking the same line format.
    Tcp { addr: String },
}

#[derive(Deserialize)]
struct Envelope {
    topic: String,
    payload: String,
}

#[derive(Serialize)]
struct Outbound<'a> {
    topic: &'a str,
    event: &'a DecodedEvent,
}

/// Parse one inbound line.
pub fn parse_envelope(line: &str) -> Result<InboundMessage, String> {
    let envelope: Envelope =
        serde_json::from_str(line).map_err(|e| format!("invalid envelope: {}", e))?;
    let payload = STANDARD
        .decode(envelope.payload.trim())
        .map_err(|e| format!("invalid base64 payload on '{}': {}", envelope.topic, e))?;
    Ok(InboundMessage {
        topic: envelope.topic,
        payload,
    })
}

/// Format one outbound line, newline included.
pub fn format_event(topic: &str, event: &DecodedEvent) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(&Outbound { topic, event })?;
    line.push('\n');
    Ok(line)
}

/// Reads envelopes from a buffered reader, skipping lines that do not parse.
pub struct LineSource<R> {
    reader: R,
    line: Vec<u8>,
    malformed: u64,
}

impl<R> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            malformed: 0,
        }
    }

    /// Number of lines dropped because they were not valid envelopes.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}

impl<R: AsyncBufRead + Unpin + Send> PayloadSource for LineSource<R> {
    fn next_message<'a>(&'a mut self) -> TransportFuture<'a, Option<InboundMessage>> {
        Box::pin(async move {
            loop {
                // A partial line left by a cancelled read stays in `self.line`.
                if self.reader.read_until(b'\n', &mut self.line).await? == 0 && self.line.is_empty()
                {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.line);
                let text = match std::str::from_utf8(&line) {
                    Ok(text) => text,
                    Err(e) => {
                        self.malformed += 1;
                        warn!("Feed: dropping line that is not UTF-8: {}", e);
                        continue;
                    }
                };
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match parse_envelope(trimmed) {
                    Ok(msg) => return Ok(Some(msg)),
                    Err(e) => {
                        self.malformed += 1;
                        warn!("Feed: dropping line: {}", e);
                    }
                }
            }
        })
    }
}

/// Writes one JSON line per published event.
pub struct LineSink<W> {
    writer: W,
}

impl<W> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin + Send> EventSink for LineSink<W> {
    fn publish<'a>(
        &'a mut self,
        topic: &'a str,
        event: &'a DecodedEvent,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let line = format_event(topic, event)?;
            self.writer.write_all(line.as_bytes()).await?;
            self.writer.flush().await?;
            Ok(())
        })
    }
}
