// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! TBR sensor records: `[delta][0xFF][temp hi][temp lo][avg][peak][freq][mem]`.

use slim_core::SensorEvent;

use crate::error::{require, DecodeError};
use crate::header::FrameHeader;

pub const SENSOR_RECORD_LEN: usize = 8;

/// Value of the second record byte that marks a sensor record.
pub const SENSOR_MARKER: u8 = 255;

/// Decode one sensor record. Returns the event and the bytes consumed.
pub fn decode_sensor(
    header: &FrameHeader,
    record: &[u8],
) -> Result<(SensorEvent, usize), DecodeError> {
    let r = require(record, SENSOR_RECORD_LEN)?;
    let temperature_raw = u16::from_be_bytes([r[2], r[3]]);

    let event = SensorEvent {
        serial_id: header.serial_id,
        unix_timestamp: header.timestamp_at(r[0]),
        temperature: f32::from_bits(u32::from(temperature_raw)),
        temperature_raw,
        avg_noise_level: r[4],
        peak_noise_level: r[5],
        recv_listen_freq: r[6],
        recv_mem_addr: r[7],
    };
    Ok((event, SENSOR_RECORD_LEN))
}
