// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Seams between the bridge and the message transport.

use std::future::Future;
use std::pin::Pin;

use slim_core::{DecodedEvent, DynResult};

/// Alias to reduce type complexity in the transport traits.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = DynResult<T>> + Send + 'a>>;

/// One message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Delivers raw payloads, one at a time, in arrival order.
pub trait PayloadSource: Send {
    /// Wait for the next message. `Ok(None)` means the source is closed.
    ///
    /// Must be cancel safe: dropping the future before it completes loses
    /// no message.
    fn next_message<'a>(&'a mut self) -> TransportFuture<'a, Option<InboundMessage>>;
}

/// Publishes decoded events.
pub trait EventSink: Send {
    fn publish<'a>(
        &'a mut self,
        topic: &'a str,
        event: &'a DecodedEvent,
    ) -> TransportFuture<'a, ()>;
}
