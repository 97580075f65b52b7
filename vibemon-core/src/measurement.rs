// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::alert::{AlertLevel, Thresholds};
use crate::gatt::Channel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The latest known temperature and vibration of a peripheral.
///
/// Both channels report independently, so a measurement is the merge of the most
/// recent value of each. A field is `None` only while its channel has not reported
/// since the session started. `observed_at` is the local receipt time of the sample
/// that produced this merge, not a peripheral timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub temperature: Option<f32>,
    pub vibration: Option<f32>,
    pub observed_at: DateTime<Utc>,
}

impl Measurement {
    /// A measurement holding a single channel value.
    #[must_use]
    pub fn from_sample(channel: Channel, value: f32, observed_at: DateTime<Utc>) -> Self {
        let empty = Self {
            temperature: None,
            vibration: None,
            observed_at,
        };
        empty.with_sample(channel, value, observed_at)
    }

    /// Merge a new sample into `previous`.
    ///
    /// Only the field of `channel` is replaced; the other field keeps its last
    /// known value.
    #[must_use]
    pub fn merge(
        previous: Option<&Measurement>,
        channel: Channel,
        value: f32,
        observed_at: DateTime<Utc>,
    ) -> Self {
        match previous {
            Some(previous) => previous.with_sample(channel, value, observed_at),
            None => Self::from_sample(channel, value, observed_at),
        }
    }

    /// Copy of `self` with one channel replaced and a fresh receipt time.
    #[must_use]
    pub fn with_sample(&self, channel: Channel, value: f32, observed_at: DateTime<Utc>) -> Self {
        let mut next = *self;
        match channel {
            Channel::Temperature => next.temperature = Some(value),
            Channel::Vibration => next.vibration = Some(value),
        }
        next.observed_at = observed_at;
        next
    }

    /// Value of the given channel, if it has reported.
    #[must_use]
    pub const fn value(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Vibration => self.vibration,
        }
    }

    /// Returns `true` once both channels have reported.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.temperature.is_some() && self.vibration.is_some()
    }

    #[must_use]
    pub fn temperature_level(&self, thresholds: &Thresholds) -> Option<AlertLevel> {
        self.temperature.map(|t| thresholds.temperature_level(t))
    }

    #[must_use]
    pub fn vibration_level(&self, thresholds: &Thresholds) -> Option<AlertLevel> {
        self.vibration.map(|v| thresholds.vibration_level(v))
    }

    /// The more severe of the two channel levels.
    #[must_use]
    pub fn worst_level(&self, thresholds: &Thresholds) -> Option<AlertLevel> {
        match (
            self.temperature_level(thresholds),
            self.vibration_level(thresholds),
        ) {
            (Some(t), Some(v)) => Some(t.max(v)),
            (t, v) => t.or(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn first_sample_leaves_other_channel_absent() {
        let m = Measurement::merge(None, Channel::Temperature, 42.5, at(1));
        assert_eq!(m.temperature, Some(42.5));
        assert_eq!(m.vibration, None);
        assert!(!m.is_complete());
    }

    #[test]
    fn merge_keeps_other_channel() {
        let first = Measurement::merge(None, Channel::Temperature, 42.5, at(1));
        let second = Measurement::merge(Some(&first), Channel::Vibration, 1.75, at(2));
        let third = Measurement::merge(Some(&second), Channel::Temperature, 43.0, at(3));

        assert_eq!(second.temperature, Some(42.5));
        assert_eq!(second.vibration, Some(1.75));
        assert_eq!(third.temperature, Some(43.0));
        assert_eq!(third.vibration, Some(1.75));
        assert_eq!(third.observed_at, at(3));
    }

    #[test]
    fn worst_level_picks_most_severe() {
        let thresholds = Thresholds::default();
        let m = Measurement::from_sample(Channel::Temperature, 45.0, at(0)).with_sample(
            Channel::Vibration,
            3.9,
            at(1),
        );

        assert_eq!(m.temperature_level(&thresholds), Some(AlertLevel::Normal));
        assert_eq!(m.vibration_level(&thresholds), Some(AlertLevel::Critical));
        assert_eq!(m.worst_level(&thresholds), Some(AlertLevel::Critical));
    }

    #[test]
    fn worst_level_with_single_channel() {
        let thresholds = Thresholds::default();
        let m = Measurement::from_sample(Channel::Vibration, 2.5, at(0));
        assert_eq!(m.temperature_level(&thresholds), None);
        assert_eq!(m.worst_level(&thresholds), Some(AlertLevel::Warning));
    }
}
