// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! SLIM acoustic telemetry frame decoder.
//!
//! A SLIM payload starts with a 6-byte [`FrameHeader`]. Status frames
//! (flag 1) update the [`PositionCache`]; telemetry frames (flag 0) are a
//! run of sensor and fish tag records that [`TelemetryScanner`] turns into
//! [`DecodedEvent`]s stamped with the buoy's last known position.

pub mod cache;
pub mod error;
pub mod fish_tag;
pub mod header;
pub mod scanner;
pub mod sensor;
pub mod status;

use tracing::{debug, warn};

pub use cache::{BuoyPosition, CachePolicy, PositionCache};
pub use error::DecodeError;
pub use header::{FrameHeader, FrameKind, HEADER_LEN};
pub use scanner::{ScanState, TelemetryScanner};
pub use slim_core::{DecodedEvent, FishTagEvent, SensorEvent, TagProtocol};

/// Result of handing one payload to [`SlimDecoder::decode`].
#[derive(Debug)]
pub enum Frame<'a> {
    /// Position update, already stored in the cache.
    Status(BuoyPosition),
    /// Telemetry records, decoded as the scanner is iterated.
    Telemetry(TelemetryScanner<'a>),
    /// Header with a reserved flag; the payload carries nothing usable.
    Reserved(FrameHeader),
}

/// Decoder context: owns the buoy position cache shared by all payloads.
#[derive(Debug, Clone)]
pub struct SlimDecoder {
    cache: PositionCache,
}

impl SlimDecoder {
    pub fn new(cache: PositionCache) -> Self {
        Self { cache }
    }

    pub fn with_capacity(max_buoys: usize, policy: CachePolicy) -> Self {
        Self::new(PositionCache::new(max_buoys, policy))
    }

    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    /// Decode one payload.
    ///
    /// Status frames are applied to the cache before returning. For
    /// telemetry frames the buoy position is looked up now and the records
    /// are decoded lazily by the returned scanner.
    pub fn decode<'a>(&mut self, payload: &'a [u8]) -> Result<Frame<'a>, DecodeError> {
        let header = FrameHeader::parse(payload)?;
        match header.kind() {
            FrameKind::Status => {
                let position = status::decode_status(payload)?;
                self.cache
                    .set(position.id, position.latitude, position.longitude)?;
                debug!(
                    "Buoy {} position lat={} lon={}",
                    position.id, position.latitude, position.longitude
                );
                Ok(Frame::Status(position))
            }
            FrameKind::Telemetry => {
                let position = match self.cache.get(header.serial_id) {
                    Some(position) => position,
                    None => {
                        warn!(
                            "Location of buoy {} not known, using (lat: 0, lon: 0)",
                            header.serial_id
                        );
                        BuoyPosition::unknown(header.serial_id)
                    }
                };
                Ok(Frame::Telemetry(TelemetryScanner::new(
                    header, payload, position,
                )))
            }
            FrameKind::Reserved(flag) => {
                debug!(
                    "Buoy {}: ignoring payload with reserved flag {}",
                    header.serial_id, flag
                );
                Ok(Frame::Reserved(header))
            }
        }
    }
}
