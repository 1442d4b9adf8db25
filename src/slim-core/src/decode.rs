// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared types for events decoded from SLIM telemetry payloads.

use serde::{Deserialize, Serialize};

use crate::tag::TagProtocol;

/// An event decoded from one telemetry sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecodedEvent {
    #[serde(rename = "sensor")]
    Sensor(SensorEvent),
    #[serde(rename = "fish_tag")]
    FishTag(FishTagEvent),
}

/// Health and ambient readings of a TBR sensor board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    pub serial_id: u16,
    pub unix_timestamp: u64,
    /// The 16-bit temperature code reinterpreted as the low bits of an
    /// IEEE-754 single. Not a numeric conversion.
    pub temperature: f32,
    /// Temperature code exactly as it appeared on the wire.
    pub temperature_raw: u16,
    pub avg_noise_level: u8,
    pub peak_noise_level: u8,
    pub recv_listen_freq: u8,
    pub recv_mem_addr: u8,
}

/// A fish tag detection, positioned at the receiving buoy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishTagEvent {
    pub serial_id: u16,
    pub unix_timestamp: u64,
    pub protocol: TagProtocol,
    pub transmitter_id: u16,
    pub transmitter_data: u16,
    /// Signal-to-noise ratio, 6 bits.
    pub snr: u8,
    /// Sub-second part of the detection time, 10 bits.
    pub millis: u16,
    /// Raw 25-bit latitude of the buoy at decode time.
    pub latitude: i32,
    /// Raw 26-bit longitude of the buoy at decode time.
    pub longitude: i32,
    /// Not carried by SLIM frames; always zero.
    pub trans_freq: u32,
    /// Not carried by SLIM frames; always zero.
    pub recv_mem_addr: u32,
}
