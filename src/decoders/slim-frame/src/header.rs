// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use crate::error::{require, DecodeError};

/// Size of the SLIM header shared by every payload.
pub const HEADER_LEN: usize = 6;

/// Header of a SLIM payload.
///
/// ```text
/// byte0     byte1              byte2..5
/// SSSSSSSS  SSSSSS FF          TTTTTTTT x4 (big-endian)
/// ```
/// `S` is the 14-bit buoy serial, `F` the 2-bit frame type flag and `T`
/// the 32-bit reference timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub serial_id: u16,
    pub type_flag: u8,
    pub reference_timestamp: u32,
}

/// Payload interpretation selected by the header flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Sensor and fish tag records follow the header.
    Telemetry,
    /// Buoy position update.
    Status,
    /// Flags 2 and 3 have no defined meaning.
    Reserved(u8),
}

impl FrameHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let head = require(bytes, HEADER_LEN)?;
        Ok(Self {
            serial_id: (u16::from(head[0]) << 6) | u16::from(head[1] >> 2),
            type_flag: head[1] & 0b11,
            reference_timestamp: u32::from_be_bytes([head[2], head[3], head[4], head[5]]),
        })
    }

    pub fn kind(&self) -> FrameKind {
        match self.type_flag {
            0 => FrameKind::Telemetry,
            1 => FrameKind::Status,
            other => FrameKind::Reserved(other),
        }
    }

    /// Timestamp of a sub-record given its one-byte delta.
    pub fn timestamp_at(&self, delta: u8) -> u64 {
        u64::from(self.reference_timestamp) + u64::from(delta)
    }
}
