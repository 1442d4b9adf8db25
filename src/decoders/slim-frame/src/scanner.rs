// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Walks the sub-records of a telemetry payload (header flag 0).

use std::iter::FusedIterator;

use slim_core::DecodedEvent;
use tracing::{debug, warn};

use crate::cache::BuoyPosition;
use crate::error::DecodeError;
use crate::fish_tag::{decode_fish_tag, MIN_TAG_RECORD_LEN};
use crate::header::{FrameHeader, HEADER_LEN};
use crate::sensor::{decode_sensor, SENSOR_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    /// Fewer than five bytes were left; they were discarded.
    Done,
    /// A record could not be decoded; the rest of the payload was dropped.
    Aborted,
}

/// Lazily decodes the records of one telemetry payload, in wire order.
///
/// Every fish tag event carries `position`, the buoy position known when
/// the payload was handed to the decoder.
#[derive(Debug, Clone)]
pub struct TelemetryScanner<'a> {
    header: FrameHeader,
    payload: &'a [u8],
    position: BuoyPosition,
    offset: usize,
    state: ScanState,
    abort_reason: Option<DecodeError>,
}

impl<'a> TelemetryScanner<'a> {
    pub fn new(header: FrameHeader, payload: &'a [u8], position: BuoyPosition) -> Self {
        Self {
            header,
            payload,
            position,
            offset: HEADER_LEN,
            state: ScanState::Scanning,
            abort_reason: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Byte offset of the next record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn abort_reason(&self) -> Option<&DecodeError> {
        self.abort_reason.as_ref()
    }

    fn decode_next(&self, record: &[u8]) -> Result<(DecodedEvent, usize), DecodeError> {
        if record[1] == SENSOR_MARKER {
            decode_sensor(&self.header, record).map(|(evt, len)| (DecodedEvent::Sensor(evt), len))
        } else {
            decode_fish_tag(&self.header, record, &self.position)
                .map(|(evt, len)| (DecodedEvent::FishTag(evt), len))
        }
    }
}

impl Iterator for TelemetryScanner<'_> {
    type Item = DecodedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != ScanState::Scanning {
            return None;
        }

        let record = self.payload.get(self.offset..).unwrap_or_default();
        if record.len() < MIN_TAG_RECORD_LEN {
            if !record.is_empty() {
                debug!(
                    "Buoy {}: discarding {} trailing bytes",
                    self.header.serial_id,
                    record.len()
                );
            }
            self.state = ScanState::Done;
            return None;
        }

        match self.decode_next(record) {
            Ok((event, consumed)) => {
                self.offset += consumed;
                Some(event)
            }
            Err(e) => {
                warn!(
                    "Buoy {}: dropping rest of telemetry payload at offset {}: {}",
                    self.header.serial_id, self.offset, e
                );
                self.state = ScanState::Aborted;
                self.abort_reason = Some(e);
                None
            }
        }
    }
}

impl FusedIterator for TelemetryScanner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use slim_core::TagProtocol;

    const HEADER: [u8; 6] = [0x01, 0x00, 0x00, 0x00, 0x10, 0x00];

    fn scanner(payload: &[u8]) -> TelemetryScanner<'_> {
        let header = FrameHeader::parse(payload).expect("header");
        TelemetryScanner::new(
            header,
            payload,
            BuoyPosition {
                id: header.serial_id,
                latitude: 100,
                longitude: 200,
            },
        )
    }

    fn payload(records: &[&[u8]]) -> Vec<u8> {
        let mut out = HEADER.to_vec();
        for record in records {
            out.extend_from_slice(record);
        }
        out
    }

    #[test]
    fn sensor_record_then_trailing_bytes_is_done() {
        let bytes = payload(&[&[1, 255, 0, 20, 3, 4, 5, 6], &[9, 9, 9]]);
        let mut scan = scanner(&bytes);
        let events: Vec<_> = scan.by_ref().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DecodedEvent::Sensor(_)));
        assert_eq!(scan.state(), ScanState::Done);
        assert_eq!(scan.offset(), 14);
        assert!(scan.abort_reason().is_none());
    }

    #[test]
    fn unknown_protocol_aborts_after_first_event() {
        let bytes = payload(&[&[0, 0, 42, 0, 0], &[0, 9, 1, 2, 3, 4, 5], &[0, 0, 7, 0, 0]]);
        let mut scan = scanner(&bytes);
        let events: Vec<_> = scan.by_ref().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(scan.state(), ScanState::Aborted);
        assert_eq!(scan.abort_reason(), Some(&DecodeError::UnknownProtocol(9)));
        assert_eq!(scan.next(), None);
    }

    #[test]
    fn truncated_sensor_record_aborts() {
        let bytes = payload(&[&[0, 255, 0, 0, 0, 0]]);
        let mut scan = scanner(&bytes);
        assert_eq!(scan.next(), None);
        assert_eq!(scan.state(), ScanState::Aborted);
        assert!(matches!(
            scan.abort_reason(),
            Some(DecodeError::TooShort { required: 8, available: 6 })
        ));
    }

    #[test]
    fn truncated_fish_tag_record_aborts() {
        // DS256 needs 7 bytes; only 5 remain.
        let bytes = payload(&[&[0, 7, 1, 2, 3]]);
        let mut scan = scanner(&bytes);
        assert_eq!(scan.next(), None);
        assert_eq!(scan.state(), ScanState::Aborted);
    }

    #[test]
    fn header_only_payload_is_done() {
        let mut scan = scanner(&HEADER);
        assert_eq!(scan.next(), None);
        assert_eq!(scan.state(), ScanState::Done);
    }

    #[test]
    fn mixed_records_keep_wire_order() {
        let bytes = payload(&[
            &[0, 1, 0x12, 0x34, 0x40, 0x01],
            &[2, 255, 0, 0, 1, 1, 1, 1],
            &[4, 6, 0x99, 0xAA, 0xBB, 0xFF, 0x01],
        ]);
        let events: Vec<_> = scanner(&bytes).collect();
        assert_eq!(events.len(), 3);
        match &events[0] {
            DecodedEvent::FishTag(tag) => {
                assert_eq!(tag.protocol, TagProtocol::R04k);
                assert_eq!(tag.transmitter_id, 0x1234);
                assert_eq!(tag.snr, 0x10);
                assert_eq!(tag.millis, 1);
                assert_eq!((tag.latitude, tag.longitude), (100, 200));
            }
            other => panic!("expected fish tag, got {:?}", other),
        }
        assert!(matches!(events[1], DecodedEvent::Sensor(_)));
        match &events[2] {
            DecodedEvent::FishTag(tag) => {
                assert_eq!(tag.protocol, TagProtocol::Hs256);
                assert_eq!(tag.transmitter_id, 0x99);
                assert_eq!(tag.transmitter_data, 0xAABB);
                assert_eq!((tag.snr, tag.millis), (63, 769));
                assert_eq!(tag.unix_timestamp, 0x1000 + 4);
            }
            other => panic!("expected fish tag, got {:?}", other),
        }
    }
}
