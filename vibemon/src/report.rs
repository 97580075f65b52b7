// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Console rendering of link snapshots and history trends.

use serde::Serialize;
use std::fmt;
use vibemon_core::{AlertLevel, Channel, MeasurementHistory, Thresholds};
use vibemon_link::LinkSnapshot;

/// A snapshot together with the alert level of each reported channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotReport {
    #[serde(flatten)]
    pub snapshot: LinkSnapshot,
    pub temperature_level: Option<AlertLevel>,
    pub vibration_level: Option<AlertLevel>,
}

impl SnapshotReport {
    #[must_use]
    pub fn new(snapshot: LinkSnapshot, thresholds: &Thresholds) -> Self {
        let temperature_level = snapshot
            .latest
            .and_then(|m| m.temperature_level(thresholds));
        let vibration_level = snapshot.latest.and_then(|m| m.vibration_level(thresholds));
        Self {
            snapshot,
            temperature_level,
            vibration_level,
        }
    }

    fn write_channel(
        f: &mut fmt::Formatter<'_>,
        channel: Channel,
        value: Option<f32>,
        level: Option<AlertLevel>,
    ) -> fmt::Result {
        match (value, level) {
            (Some(value), Some(level)) => {
                write!(f, "  {channel} {value:.2} {} ({level})", channel.unit())
            }
            _ => write!(f, "  {channel} --"),
        }
    }
}

impl fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = &self.snapshot;
        write!(f, "[{}]", snapshot.state)?;
        if let Some(peripheral) = &snapshot.peripheral {
            write!(f, " {peripheral}")?;
        }
        if let Some(latest) = &snapshot.latest {
            Self::write_channel(
                f,
                Channel::Temperature,
                latest.temperature,
                self.temperature_level,
            )?;
            Self::write_channel(f, Channel::Vibration, latest.vibration, self.vibration_level)?;
        }
        write!(f, "  history {}", snapshot.history_len)?;
        if let Some(error) = &snapshot.last_error {
            write!(f, "  error: {error}")?;
        }
        Ok(())
    }
}

/// Min/max/mean of one channel over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Level of the worst value in the window.
    pub peak_level: AlertLevel,
}

impl ChannelStats {
    fn collect(
        values: impl Iterator<Item = f32>,
        level: impl Fn(f32) -> AlertLevel,
    ) -> Option<Self> {
        let mut count = 0_u32;
        let mut sum = 0.0_f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f32,
            peak_level: level(max),
        })
    }
}

/// Summary of the most recent history entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub entries: usize,
    pub temperature: Option<ChannelStats>,
    pub vibration: Option<ChannelStats>,
}

impl TrendSummary {
    /// Summarize the last `window` entries of `history`.
    #[must_use]
    pub fn from_history(history: &MeasurementHistory, window: usize, thresholds: &Thresholds) -> Self {
        let recent: Vec<_> = history.recent(window).collect();
        Self {
            entries: recent.len(),
            temperature: ChannelStats::collect(
                recent.iter().filter_map(|m| m.temperature),
                |v| thresholds.temperature_level(v),
            ),
            vibration: ChannelStats::collect(
                recent.iter().filter_map(|m| m.vibration),
                |v| thresholds.vibration_level(v),
            ),
        }
    }
}

impl fmt::Display for TrendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "last {} entries", self.entries)?;
        for (channel, stats) in [
            (Channel::Temperature, self.temperature),
            (Channel::Vibration, self.vibration),
        ] {
            match stats {
                Some(stats) => write!(
                    f,
                    "; {channel} min {:.2} max {:.2} mean {:.2} {} (peak {})",
                    stats.min,
                    stats.max,
                    stats.mean,
                    channel.unit(),
                    stats.peak_level
                )?,
                None => write!(f, "; {channel} no data")?,
            }
        }
        Ok(())
    }
}
