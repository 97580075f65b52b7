// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded rolling history of merged measurements.

use crate::measurement::Measurement;
use std::collections::VecDeque;

/// Maximum number of measurements kept.
pub const HISTORY_CAPACITY: usize = 100;

/// Ordered, append-only sequence of measurements with oldest-first eviction.
///
/// The history never holds more than [`HISTORY_CAPACITY`] entries. It is not
/// cleared when a peripheral disconnects, so a brief drop does not erase the trend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementHistory {
    entries: VecDeque<Measurement>,
}

impl MeasurementHistory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a measurement, evicting the oldest one once the capacity is exceeded.
    ///
    /// Returns the evicted measurement, if any.
    pub fn push(&mut self, measurement: Measurement) -> Option<Measurement> {
        self.entries.push_back(measurement);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front()
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Measurement> {
        self.entries.back()
    }

    #[must_use]
    pub fn oldest(&self) -> Option<&Measurement> {
        self.entries.front()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Measurement> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The last `n` measurements, oldest first (the trend window).
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Measurement> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a MeasurementHistory {
    type Item = &'a Measurement;
    type IntoIter = std::collections::vec_deque::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
