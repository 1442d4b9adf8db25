// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! SLIM status frames (header flag 1).
//!
//! Status frames reuse header bytes for the position:
//!
//! ```text
//! longitude (26 bit) = byte1[1:0] byte2 byte3 byte4
//! latitude  (25 bit) = byte5[0]   byte6 byte7 byte8
//! ```
//! The values are raw bit concatenations without sign extension, so they
//! must be decoded from the payload itself rather than a parsed header.

use crate::cache::BuoyPosition;
use crate::error::{require, DecodeError};
use crate::header::FrameHeader;

pub const STATUS_FRAME_LEN: usize = 9;

const LATITUDE_MASK: i32 = (1 << 25) - 1;
const LONGITUDE_MASK: i32 = (1 << 26) - 1;

pub fn decode_status(payload: &[u8]) -> Result<BuoyPosition, DecodeError> {
    let b = require(payload, STATUS_FRAME_LEN)?;
    let header = FrameHeader::parse(b)?;

    let latitude = (i32::from(b[5] & 0b1) << 24)
        | (i32::from(b[6]) << 16)
        | (i32::from(b[7]) << 8)
        | i32::from(b[8]);
    let longitude = (i32::from(b[1] & 0b11) << 24)
        | (i32::from(b[2]) << 16)
        | (i32::from(b[3]) << 8)
        | i32::from(b[4]);

    Ok(BuoyPosition {
        id: header.serial_id,
        latitude,
        longitude,
    })
}

/// Pack a position into status frame bytes.
///
/// Only the low 25 latitude and 26 longitude bits fit. The top two
/// longitude bits share space with the header flag, so the result is only
/// a valid status frame when they equal `0b01`.
pub fn encode_status(serial_id: u16, latitude: i32, longitude: i32) -> [u8; STATUS_FRAME_LEN] {
    let lat = (latitude & LATITUDE_MASK).to_be_bytes();
    let lon = (longitude & LONGITUDE_MASK).to_be_bytes();
    let serial = serial_id & 0x3FFF;
    [
        (serial >> 6) as u8,
        ((serial as u8 & 0x3F) << 2) | lon[0],
        lon[1],
        lon[2],
        lon[3],
        lat[0],
        lat[1],
        lat[2],
        lat[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::FrameKind;

    #[test]
    fn decodes_position_bits() {
        let payload = [0x00, 0b0001_1110, 0xAB, 0xCD, 0xEF, 0b1111_1111, 0x12, 0x34, 0x56];
        let pos = decode_status(&payload).expect("status");
        assert_eq!(pos.id, 0b000111);
        assert_eq!(pos.longitude, 0x02AB_CDEF);
        // Only the low bit of byte5 belongs to the latitude.
        assert_eq!(pos.latitude, 0x0112_3456);
    }

    #[test]
    fn values_are_not_sign_extended() {
        let payload = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let pos = decode_status(&payload).expect("status");
        assert_eq!(pos.latitude, LATITUDE_MASK);
        assert_eq!(pos.longitude, LONGITUDE_MASK);
        assert!(pos.latitude > 0 && pos.longitude > 0);
    }

    #[test]
    fn round_trip_preserves_bits() {
        let latitude = 0x01A2_B3C4 & LATITUDE_MASK;
        let longitude = 0x0155_6677;
        let bytes = encode_status(1234, latitude, longitude);
        let header = FrameHeader::parse(&bytes).expect("header");
        assert_eq!(header.kind(), FrameKind::Status);
        let pos = decode_status(&bytes).expect("status");
        assert_eq!(
            pos,
            BuoyPosition {
                id: 1234,
                latitude,
                longitude
            }
        );
    }

    #[test]
    fn round_trip_keeps_raw_bits_for_any_input() {
        for (lat, lon) in [(0, 0), (-1, -1), (i32::MAX, i32::MIN), (0x00AB_CDEF, 0x03FF_0000)] {
            let pos = decode_status(&encode_status(9, lat, lon)).expect("status");
            assert_eq!(pos.latitude, lat & LATITUDE_MASK);
            assert_eq!(pos.longitude, lon & LONGITUDE_MASK);
        }
    }

    #[test]
    fn truncated_status_is_rejected() {
        let payload = [0x00, 0x01, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            decode_status(&payload),
            Err(DecodeError::TooShort {
                required: STATUS_FRAME_LEN,
                available: 8
            })
        );
    }
}
