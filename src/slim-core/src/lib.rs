// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod decode;
pub mod tag;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use decode::{DecodedEvent, FishTagEvent, SensorEvent};
pub use tag::{FieldWidth, TagLayout, TagProtocol};
