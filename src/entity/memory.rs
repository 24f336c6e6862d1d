//! Bounded-horizon memory of sightings
//!
//! One record per subject, replaced on every new sighting. Records go stale
//! once they are older than the observer's horizon, or when the observer
//! walks onto the remembered tile and finds the subject gone. Stale records
//! stay queryable until the next sighting overwrites them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Tick, TilePos};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Where the subject was seen
    pub tile: TilePos,
    pub value: f32,
    pub risk: f32,
    /// Observer age at the sighting
    pub timestamp: Tick,
    /// Set when the subject was found missing from `tile`
    pub invalidated: bool,
}

impl Memory {
    pub fn new(tile: TilePos, value: f32, risk: f32, timestamp: Tick) -> Self {
        Self {
            tile,
            value,
            risk,
            timestamp,
            invalidated: false,
        }
    }

    /// Ticks elapsed since the sighting, from the observer's point of view
    pub fn age_at(&self, age: Tick) -> f32 {
        age.saturating_sub(self.timestamp) as f32
    }

    pub fn is_fresh(&self, age: Tick, horizon: f32) -> bool {
        !self.invalidated && self.age_at(age) < horizon
    }
}

/// Memories keyed by subject id, iterated in id order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore<K: Ord> {
    records: BTreeMap<K, Memory>,
}

impl<K: Ord> Default for MemoryStore<K> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> MemoryStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sighting, replacing any older record of the same subject
    pub fn record(&mut self, subject: K, memory: Memory) -> Option<Memory> {
        self.records.insert(subject, memory)
    }

    pub fn get(&self, subject: &K) -> Option<&Memory> {
        self.records.get(subject)
    }

    pub fn get_mut(&mut self, subject: &K) -> Option<&mut Memory> {
        self.records.get_mut(subject)
    }

    pub fn is_fresh(&self, subject: &K, age: Tick, horizon: f32) -> bool {
        self.records
            .get(subject)
            .is_some_and(|m| m.is_fresh(age, horizon))
    }

    /// Fresh records only
    pub fn fresh(&self, age: Tick, horizon: f32) -> impl Iterator<Item = (K, &Memory)> + '_ {
        self.records
            .iter()
            .filter(move |(_, m)| m.is_fresh(age, horizon))
            .map(|(k, m)| (*k, m))
    }

    /// Every record, stale or not
    pub fn iter(&self) -> impl Iterator<Item = (K, &Memory)> + '_ {
        self.records.iter().map(|(k, m)| (*k, m))
    }

    /// Mark a record as a phantom sighting
    pub fn invalidate(&mut self, subject: &K) -> bool {
        match self.records.get_mut(subject) {
            Some(memory) => {
                memory.invalidated = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
