// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fish tag transmitter protocols and their SLIM record layouts.
//!
//! Each protocol id maps to exactly one [`TagLayout`]. The telemetry
//! scanner advances by `layout().size` and the field decoder reads the
//! widths from the same entry, so the two cannot disagree.

use serde::{Deserialize, Serialize};

/// Width of a variable field inside a fish tag record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Absent,
    Bits8,
    Bits16,
}

impl FieldWidth {
    /// Number of bytes the field occupies on the wire.
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::Absent => 0,
            FieldWidth::Bits8 => 1,
            FieldWidth::Bits16 => 2,
        }
    }
}

/// Record layout for one protocol: `[delta][protocol][id..][data..][snr/millis x2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLayout {
    /// Total record size in bytes, including delta, protocol and trailer.
    pub size: usize,
    pub id_width: FieldWidth,
    pub data_width: FieldWidth,
}

impl TagLayout {
    const fn new(size: usize, id_width: FieldWidth, data_width: FieldWidth) -> Self {
        Self {
            size,
            id_width,
            data_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagProtocol {
    #[serde(rename = "R256")]
    R256,
    #[serde(rename = "R04K")]
    R04k,
    #[serde(rename = "R64K")]
    R64k,
    #[serde(rename = "S256")]
    S256,
    #[serde(rename = "R01M")]
    R01m,
    #[serde(rename = "S64K")]
    S64k,
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "DS256")]
    Ds256,
}

const PROTOCOLS: [(TagProtocol, TagLayout); 8] = {
    use FieldWidth::{Absent, Bits16, Bits8};
    [
        (TagProtocol::R256, TagLayout::new(5, Bits8, Absent)),
        (TagProtocol::R04k, TagLayout::new(6, Bits16, Absent)),
        (TagProtocol::R64k, TagLayout::new(6, Bits16, Absent)),
        (TagProtocol::S256, TagLayout::new(6, Bits8, Bits8)),
        (TagProtocol::R01m, TagLayout::new(7, Bits16, Bits8)),
        (TagProtocol::S64k, TagLayout::new(7, Bits16, Bits8)),
        (TagProtocol::Hs256, TagLayout::new(7, Bits8, Bits16)),
        (TagProtocol::Ds256, TagLayout::new(7, Bits8, Bits16)),
    ]
};

impl TagProtocol {
    pub const ALL: [TagProtocol; 8] = [
        TagProtocol::R256,
        TagProtocol::R04k,
        TagProtocol::R64k,
        TagProtocol::S256,
        TagProtocol::R01m,
        TagProtocol::S64k,
        TagProtocol::Hs256,
        TagProtocol::Ds256,
    ];

    /// Look up a protocol by its on-wire id. Ids above 7 are unknown.
    pub fn from_id(id: u8) -> Option<Self> {
        PROTOCOLS.get(usize::from(id)).map(|(protocol, _)| *protocol)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn layout(self) -> TagLayout {
        PROTOCOLS[self as usize].1
    }

    pub fn name(self) -> &'static str {
        match self {
            TagProtocol::R256 => "R256",
            TagProtocol::R04k => "R04K",
            TagProtocol::R64k => "R64K",
            TagProtocol::S256 => "S256",
            TagProtocol::R01m => "R01M",
            TagProtocol::S64k => "S64K",
            TagProtocol::Hs256 => "HS256",
            TagProtocol::Ds256 => "DS256",
        }
    }
}

impl std::fmt::Display for TagProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
