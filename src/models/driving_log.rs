// SPDX-License-Identifier: MIT

//! Per-day logged hours and the per-user history.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hours logged for a single calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default)]
    pub day_hours: f64,
    #[serde(default)]
    pub night_hours: f64,
}

impl DayEntry {
    /// An entry with no positive hours is equivalent to no entry at all.
    pub fn is_empty(&self) -> bool {
        self.day_hours <= 0.0 && self.night_hours <= 0.0
    }
}

/// A user's full date -> hours history, keyed by ISO `YYYY-MM-DD`.
///
/// Invariant: an entry whose hours are all zero is never stored; writers
/// delete the key instead, so absence and zero are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrivingLog(HashMap<String, DayEntry>);

impl DrivingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_entry(&self, date: &str) -> bool {
        self.0.get(date).is_some_and(|e| !e.is_empty())
    }

    pub fn entry(&self, date: &str) -> Option<DayEntry> {
        self.0.get(date).copied().filter(|e| !e.is_empty())
    }

    /// Upsert the entry for a date. Zero-hour entries delete the key.
    pub fn set_entry(&mut self, date: &str, entry: DayEntry) {
        if entry.is_empty() {
            self.0.remove(date);
        } else {
            self.0.insert(date.to_string(), entry);
        }
    }

    pub fn remove_entry(&mut self, date: &str) {
        self.0.remove(date);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DayEntry)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
