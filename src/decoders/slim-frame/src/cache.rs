// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Last-known position of every buoy that has sent a status frame.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::error::DecodeError;

/// Raw position bits of a buoy, as carried by its status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuoyPosition {
    pub id: u16,
    pub latitude: i32,
    pub longitude: i32,
}

impl BuoyPosition {
    /// Placeholder for a buoy whose position is not (yet) known.
    pub fn unknown(id: u16) -> Self {
        Self {
            id,
            latitude: 0,
            longitude: 0,
        }
    }
}

/// What [`PositionCache::set`] does with a new buoy once the cache is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Refuse the new buoy and keep every known one.
    #[default]
    Reject,
    /// Drop the buoy that was first inserted to make room.
    EvictOldest,
}

/// Bounded buoy id -> position map, kept in insertion order.
#[derive(Debug, Clone)]
pub struct PositionCache {
    entries: VecDeque<BuoyPosition>,
    capacity: usize,
    policy: CachePolicy,
}

impl PositionCache {
    /// Create an empty cache. A capacity of zero is raised to one.
    pub fn new(capacity: usize, policy: CachePolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            policy,
        }
    }

    pub fn get(&self, id: u16) -> Option<BuoyPosition> {
        self.entries.iter().find(|entry| entry.id == id).copied()
    }

    /// Store the position of `id`, overwriting it in place when known.
    pub fn set(&mut self, id: u16, latitude: i32, longitude: i32) -> Result<(), DecodeError> {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.latitude = latitude;
            entry.longitude = longitude;
            return Ok(());
        }

        if self.entries.len() >= self.capacity {
            match self.policy {
                CachePolicy::Reject => {
                    warn!(
                        "Position cache full ({} buoys), ignoring buoy {}",
                        self.capacity, id
                    );
                    return Err(DecodeError::CacheFull {
                        serial_id: id,
                        capacity: self.capacity,
                    });
                }
                CachePolicy::EvictOldest => {
                    if let Some(evicted) = self.entries.pop_front() {
                        info!(
                            "Position cache full, evicting buoy {} for buoy {}",
                            evicted.id, id
                        );
                    }
                }
            }
        }

        info!("Adding buoy {} to position cache", id);
        self.entries.push_back(BuoyPosition {
            id,
            latitude,
            longitude,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuoyPosition> {
        self.entries.iter()
    }
}
