// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fish tag detection records.
//!
//! `[delta][protocol][transmitter id][transmitter data][snr:6|millis:10]`
//! where the id and data widths come from the protocol's [`TagLayout`].

use slim_core::{FieldWidth, FishTagEvent, TagLayout, TagProtocol};

use crate::cache::BuoyPosition;
use crate::error::{require, DecodeError};
use crate::header::FrameHeader;

/// Size of the smallest fish tag record (R256).
pub const MIN_TAG_RECORD_LEN: usize = 5;

/// Resolve the protocol and layout of the record starting at `record`.
///
/// Unknown ids fail without guessing a size.
pub fn record_layout(record: &[u8]) -> Result<(TagProtocol, TagLayout), DecodeError> {
    let head = require(record, 2)?;
    let protocol = TagProtocol::from_id(head[1]).ok_or(DecodeError::UnknownProtocol(head[1]))?;
    Ok((protocol, protocol.layout()))
}

/// Split the two trailing bytes into the 6-bit SNR and 10-bit millis.
pub fn split_trailer(hi: u8, lo: u8) -> (u8, u16) {
    (hi >> 2, (u16::from(hi & 0b11) << 8) | u16::from(lo))
}

fn read_field(record: &[u8], cursor: &mut usize, width: FieldWidth) -> u16 {
    let value = match width {
        FieldWidth::Absent => 0,
        FieldWidth::Bits8 => u16::from(record[*cursor]),
        FieldWidth::Bits16 => u16::from_be_bytes([record[*cursor], record[*cursor + 1]]),
    };
    *cursor += width.bytes();
    value
}

/// Decode one fish tag record. Returns the event and the bytes consumed.
pub fn decode_fish_tag(
    header: &FrameHeader,
    record: &[u8],
    position: &BuoyPosition,
) -> Result<(FishTagEvent, usize), DecodeError> {
    let (protocol, layout) = record_layout(record)?;
    let r = require(record, layout.size)?;

    let mut cursor = 2;
    let transmitter_id = read_field(r, &mut cursor, layout.id_width);
    let transmitter_data = read_field(r, &mut cursor, layout.data_width);
    debug_assert_eq!(cursor + 2, layout.size);
    let (snr, millis) = split_trailer(r[layout.size - 2], r[layout.size - 1]);

    let event = FishTagEvent {
        serial_id: header.serial_id,
        unix_timestamp: header.timestamp_at(r[0]),
        protocol,
        transmitter_id,
        transmitter_data,
        snr,
        millis,
        latitude: position.latitude,
        longitude: position.longitude,
        trans_freq: 0,
        recv_mem_addr: 0,
    };
    Ok((event, layout.size))
}
